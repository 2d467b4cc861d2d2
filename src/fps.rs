//! Frame-rate counter backing the on-screen readout.

/// Counts frames against wall time and reports a rate once per second.
#[derive(Debug, Clone, Default)]
pub struct FpsMeter {
    frames: u32,
    window_start: Option<f64>,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one rendered frame at wall time `wall_millis`. Returns the
    /// rounded frames-per-second once a whole second has elapsed since the
    /// last report, then restarts the measurement window.
    pub fn frame(&mut self, wall_millis: f64) -> Option<u32> {
        let start = *self.window_start.get_or_insert(wall_millis);
        self.frames += 1;
        let elapsed = wall_millis - start;
        if elapsed < 1000.0 {
            return None;
        }
        let fps = (self.frames as f64 * 1000.0 / elapsed).round() as u32;
        self.frames = 0;
        self.window_start = Some(wall_millis);
        Some(fps)
    }
}
