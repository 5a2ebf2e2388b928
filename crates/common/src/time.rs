/// Turns the host's monotonically increasing frame timestamps into deltas.
///
/// The previous timestamp starts at zero, so the first delta is measured from
/// the origin of the host clock.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    prev_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now_ms` and return the milliseconds since the last one.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let dt = now_ms - self.prev_ms;
        self.prev_ms = now_ms;
        dt
    }

    /// Timestamp of the most recent frame.
    pub fn last(&self) -> f64 {
        self.prev_ms
    }
}
