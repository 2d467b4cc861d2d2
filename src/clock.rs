//! Frame timing with a freeze/step debug mode.
//!
//! The clock accumulates simulation time scaled by the speed multiplier.
//! Freezing pins the reported time to a fixed value while wall time keeps
//! flowing underneath; arrow-key stepping nudges the pinned value by one
//! nominal frame so a frozen animation can be scrubbed frame by frame.

/// Nominal frame interval at 60 Hz, in milliseconds.
pub const FRAME_MILLIS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Wall time of the previous frame, regardless of frozen-ness.
    last_render_millis: Option<f64>,
    /// Accumulated simulation time in milliseconds.
    sim_millis: f64,
    /// When set, `advance` reports this value instead of simulation time.
    frozen_at: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at wall time `now_millis` and return the effective
    /// time handed to per-frame callbacks and the shader. While running,
    /// elapsed wall time scaled by `speed` accrues to simulation time; while
    /// frozen, accumulation stops and the pinned value is returned.
    pub fn advance(&mut self, now_millis: f64, speed: f32) -> f64 {
        let elapsed = match self.last_render_millis {
            Some(last) => now_millis - last,
            None => 0.0,
        };
        self.last_render_millis = Some(now_millis);
        if self.frozen_at.is_none() {
            self.sim_millis += elapsed * speed as f64;
        }
        self.effective_millis()
    }

    /// Effective time as of the last `advance`, in milliseconds.
    pub fn effective_millis(&self) -> f64 {
        self.frozen_at.unwrap_or(self.sim_millis)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_at.is_some()
    }

    /// Freeze at the current simulation time, or resume if already frozen.
    /// Resuming continues from the (possibly stepped) frozen point; the time
    /// spent frozen is not replayed.
    pub fn toggle_freeze(&mut self) {
        match self.frozen_at.take() {
            Some(pinned) => self.sim_millis = pinned,
            None => self.frozen_at = Some(self.sim_millis),
        }
    }

    /// Pin the clock to an explicit timestamp, entering frozen mode.
    pub fn freeze_at(&mut self, millis: f64) {
        self.sim_millis = millis;
        self.frozen_at = Some(millis);
    }

    /// Advance the pinned time by one nominal frame. No-op while running.
    pub fn step_forward(&mut self) {
        if let Some(pinned) = &mut self.frozen_at {
            *pinned += FRAME_MILLIS;
        }
    }

    /// Rewind the pinned time by one nominal frame. No-op while running.
    pub fn step_back(&mut self) {
        if let Some(pinned) = &mut self.frozen_at {
            *pinned -= FRAME_MILLIS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_sees_zero_elapsed_time() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(5000.0, 1.0), 0.0);
        assert_eq!(clock.advance(5016.0, 1.0), 16.0);
    }

    #[test]
    fn speed_scales_accumulation() {
        let mut clock = FrameClock::new();
        clock.advance(0.0, 1.0);
        clock.advance(100.0, 2.0);
        assert_eq!(clock.effective_millis(), 200.0);
        clock.advance(200.0, -1.0);
        assert_eq!(clock.effective_millis(), 100.0);
    }

    #[test]
    fn frozen_clock_reports_identical_time_across_ticks() {
        let mut clock = FrameClock::new();
        clock.advance(0.0, 1.0);
        clock.advance(16.0, 1.0);
        clock.toggle_freeze();
        let pinned = clock.advance(1000.0, 1.0);
        assert_eq!(pinned, 16.0);
        assert_eq!(clock.advance(2000.0, 1.0), pinned);
        assert_eq!(clock.advance(9999.0, 5.0), pinned);
    }

    #[test]
    fn step_moves_pinned_time_by_one_frame() {
        let mut clock = FrameClock::new();
        clock.advance(0.0, 1.0);
        clock.advance(100.0, 1.0);
        clock.toggle_freeze();
        let origin = clock.effective_millis();

        clock.step_forward();
        assert_eq!(clock.effective_millis(), origin + FRAME_MILLIS);

        clock.step_forward();
        clock.step_back();
        assert_eq!(clock.effective_millis(), origin + FRAME_MILLIS);
    }

    #[test]
    fn stepping_while_running_does_nothing() {
        let mut clock = FrameClock::new();
        clock.advance(0.0, 1.0);
        clock.advance(50.0, 1.0);
        clock.step_forward();
        clock.step_back();
        assert_eq!(clock.effective_millis(), 50.0);
    }

    #[test]
    fn unfreeze_resumes_from_the_frozen_point() {
        let mut clock = FrameClock::new();
        clock.advance(0.0, 1.0);
        clock.advance(100.0, 1.0);
        clock.toggle_freeze();
        clock.step_forward();
        clock.advance(5000.0, 1.0); // wall time keeps flowing underneath
        clock.toggle_freeze();
        // The frozen gap is not replayed; time continues from the stepped point.
        assert_eq!(clock.advance(5010.0, 1.0), 100.0 + FRAME_MILLIS + 10.0);
    }

    #[test]
    fn freeze_at_pins_an_explicit_timestamp() {
        let mut clock = FrameClock::new();
        clock.advance(0.0, 1.0);
        clock.freeze_at(1.0);
        assert!(clock.is_frozen());
        assert_eq!(clock.advance(12345.0, 1.0), 1.0);
    }
}
