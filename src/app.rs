//! Application state and the per-frame update cycle.
//!
//! `App` owns everything the frame loop mutates: the wave buffer, the frame
//! clock, the settings, and the tracked pointer. Event handlers translate DOM
//! events into [`Command`]s and normalized pointer updates; the render glue
//! calls [`App::frame`] once per animation frame and hands the result to the
//! shader.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::clock::FrameClock;
use crate::settings::Settings;
use crate::walk::{Walk, WalkConfig};
use crate::wave::{WaveBuffer, WaveRecord, WaveShape, WaveStart, WAVE_COUNT};

/// Discrete commands from the keyboard and the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Space / panel button: pin or release the animation clock.
    ToggleFreeze,
    /// Right arrow: advance frozen time by one nominal frame.
    StepForward,
    /// Left arrow: rewind frozen time by one nominal frame.
    StepBack,
    /// Down arrow: start one wave at the tracked pointer position.
    InjectWave,
    /// `c`: disable every wave slot.
    Clear,
    /// `t`: load a fixed debug pattern and freeze.
    TestPattern,
    /// Panel trigger: re-seed the buffer with a random pattern.
    Randomize,
}

/// Tracked pointer position (normalized) and button state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub held: bool,
}

/// Timing for one frame, handed to hooks and the renderer.
#[derive(Debug, Clone, Copy)]
pub struct FrameTiming {
    /// True wall time of the frame in milliseconds.
    pub wall_millis: f64,
    /// Effective animation time in seconds (pinned while frozen).
    pub seconds: f32,
}

/// Per-frame observer invoked in registration order on every tick, after
/// wave injection and before the draw call.
pub trait FrameHook {
    fn frame(&mut self, timing: &FrameTiming);
}

pub struct App {
    pub waves: WaveBuffer,
    pub clock: FrameClock,
    pub settings: Settings,
    pointer: PointerState,
    hue: Walk,
    rng: SmallRng,
    hooks: Vec<Box<dyn FrameHook>>,
}

impl App {
    /// App with an entropy-seeded rng and the startup random wave pattern.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// App with a caller-supplied rng; tests seed it for determinism.
    pub fn with_rng(mut rng: SmallRng) -> Self {
        let mut waves = WaveBuffer::new();
        waves.randomize(&mut rng);
        let hue = Walk::new(WalkConfig::new(0.05, 0.1, 0.5), &mut rng);
        Self {
            waves,
            clock: FrameClock::new(),
            settings: Settings::default(),
            pointer: PointerState::default(),
            hue,
            rng,
            hooks: Vec::new(),
        }
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.pointer = PointerState { x, y, held: true };
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer.x = x;
        self.pointer.y = y;
    }

    pub fn pointer_up(&mut self) {
        self.pointer.held = false;
    }

    /// Register an observer called on every frame, in registration order.
    pub fn register_hook(&mut self, hook: Box<dyn FrameHook>) {
        self.hooks.push(hook);
    }

    pub fn command(&mut self, command: Command) {
        match command {
            Command::ToggleFreeze => self.clock.toggle_freeze(),
            Command::StepForward => self.clock.step_forward(),
            Command::StepBack => self.clock.step_back(),
            Command::InjectWave => self.inject_wave(self.clock.effective_millis()),
            Command::Clear => self.waves.clear(),
            Command::TestPattern => self.test_pattern(),
            Command::Randomize => self.waves.randomize(&mut self.rng),
        }
    }

    /// Run one frame: advance the clock, inject a wave while the pointer is
    /// held, then run the registered hooks. Returns the frame timing for the
    /// renderer.
    pub fn frame(&mut self, now_millis: f64) -> FrameTiming {
        let effective = self.clock.advance(now_millis, self.settings.speed);
        if self.pointer.held {
            self.inject_wave(effective);
        }
        let timing = FrameTiming {
            wall_millis: now_millis,
            seconds: (effective / 1000.0) as f32,
        };
        let mut hooks = std::mem::take(&mut self.hooks);
        for hook in &mut hooks {
            hook.frame(&timing);
        }
        self.hooks = hooks;
        timing
    }

    fn inject_wave(&mut self, millis: f64) {
        let hue = self.hue.next(&mut self.rng);
        self.waves.push_front(WaveRecord {
            x: self.pointer.x,
            y: self.pointer.y,
            start: WaveStart::Active((millis / 1000.0) as f32),
            hue,
            shape: self.settings.shape,
        });
    }

    /// One row of fixed waves, frozen just after their start time. Useful
    /// for eyeballing the shader's decay functions.
    fn test_pattern(&mut self) {
        self.waves.clear();
        self.clock.freeze_at(1.0);
        for j in 0..WAVE_COUNT {
            self.waves.write(
                j,
                WaveRecord {
                    x: j as f32 / 10.0,
                    y: 0.5,
                    start: WaveStart::Active(0.001),
                    hue: 0.65,
                    shape: WaveShape::DecayingSine,
                },
            );
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn app() -> App {
        App::with_rng(SmallRng::seed_from_u64(42))
    }

    #[test]
    fn held_pointer_injects_one_wave_per_frame() {
        let mut app = app();
        app.command(Command::Clear);
        app.pointer_down(0.25, 0.75);
        app.frame(0.0);
        app.frame(500.0);
        assert_eq!(app.waves.slot(0).start, WaveStart::Active(0.5));
        assert_eq!(app.waves.slot(0).x, 0.25);
        assert_eq!(app.waves.slot(1).start, WaveStart::Active(0.0));
        assert_eq!(app.waves.slot(2).start, WaveStart::Inactive);

        app.pointer_up();
        app.frame(600.0);
        assert_eq!(app.waves.slot(0).start, WaveStart::Active(0.5));
    }

    #[test]
    fn pointer_move_updates_position_without_injecting() {
        let mut app = app();
        app.command(Command::Clear);
        app.pointer_move(0.1, 0.9);
        app.frame(0.0);
        assert_eq!(app.waves.slot(0).start, WaveStart::Inactive);
        assert_eq!(app.pointer().x, 0.1);
        assert!(!app.pointer().held);
    }

    #[test]
    fn inject_command_uses_the_frozen_time() {
        let mut app = app();
        app.command(Command::Clear);
        app.frame(0.0);
        app.frame(500.0);
        app.command(Command::ToggleFreeze);
        app.frame(9000.0);
        app.pointer_move(0.4, 0.6);
        app.command(Command::InjectWave);
        assert_eq!(app.waves.slot(0).start, WaveStart::Active(0.5));
    }

    #[test]
    fn test_pattern_freezes_and_fills_the_row() {
        let mut app = app();
        app.command(Command::TestPattern);
        assert!(app.clock.is_frozen());
        assert_eq!(app.clock.effective_millis(), 1.0);
        for j in 0..WAVE_COUNT {
            let slot = app.waves.slot(j);
            assert_eq!(slot.x, j as f32 / 10.0);
            assert_eq!(slot.y, 0.5);
            assert_eq!(slot.start, WaveStart::Active(0.001));
            assert_eq!(slot.hue, 0.65);
        }
    }

    #[test]
    fn clear_command_disables_every_slot() {
        let mut app = app(); // starts randomized
        app.command(Command::Clear);
        for j in 0..WAVE_COUNT {
            assert_eq!(*app.waves.slot(j), WaveRecord::placeholder());
        }
    }

    #[test]
    fn randomize_command_reseeds_every_slot() {
        let mut app = app();
        app.command(Command::Clear);
        app.command(Command::Randomize);
        for j in 0..WAVE_COUNT {
            assert_ne!(app.waves.slot(j).start, WaveStart::Inactive);
        }
    }

    struct RecordingHook {
        label: &'static str,
        log: Rc<RefCell<Vec<(&'static str, f32)>>>,
    }

    impl FrameHook for RecordingHook {
        fn frame(&mut self, timing: &FrameTiming) {
            self.log.borrow_mut().push((self.label, timing.seconds));
        }
    }

    #[test]
    fn hooks_run_in_registration_order_with_pinned_time() {
        let mut app = app();
        let log = Rc::new(RefCell::new(Vec::new()));
        app.register_hook(Box::new(RecordingHook { label: "a", log: log.clone() }));
        app.register_hook(Box::new(RecordingHook { label: "b", log: log.clone() }));

        app.frame(0.0);
        app.frame(250.0);
        app.command(Command::ToggleFreeze);
        app.frame(1000.0);
        app.frame(2000.0);

        let log = log.borrow();
        let labels: Vec<&str> = log.iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, ["a", "b", "a", "b", "a", "b", "a", "b"]);
        // Frozen frames observe the pinned time regardless of wall input.
        assert_eq!(log[4].1, 0.25);
        assert_eq!(log[6].1, 0.25);
    }

    #[test]
    fn negative_speed_runs_time_backwards() {
        let mut app = app();
        app.settings.speed = -1.0;
        app.frame(0.0);
        let timing = app.frame(250.0);
        assert_eq!(timing.seconds, -0.25);
    }
}
