/// Timing snapshot for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the previous frame (after clamping).
    pub dt: f32,
    /// Seconds since the clock started.
    pub total: f32,
    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

/// Frame clock fed by the host.
///
/// The host passes its measured frame delta in; the clock accumulates total
/// time and clamps the delta so a stalled tab does not teleport animations.
#[derive(Debug, Clone)]
pub struct FrameClock {
    total: f32,
    frame_index: u64,
    max_dt: f32,
}

impl FrameClock {
    /// Default cap on a single frame delta, in seconds.
    pub const DEFAULT_MAX_DT: f32 = 0.25;

    pub fn new() -> Self {
        Self::with_max_dt(Self::DEFAULT_MAX_DT)
    }

    pub fn with_max_dt(max_dt: f32) -> Self {
        Self {
            total: 0.0,
            frame_index: 0,
            max_dt: max_dt.max(0.0),
        }
    }

    /// Advance by `dt` seconds and return the new frame's timing.
    /// Negative deltas count as zero.
    pub fn advance(&mut self, dt: f32) -> FrameTime {
        let dt = dt.clamp(0.0, self.max_dt);
        self.total += dt;
        let frame = FrameTime {
            dt,
            total: self.total,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        frame
    }

    /// Seconds accumulated so far.
    pub fn total(&self) -> f32 {
        self.total
    }

    /// Number of frames advanced so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Restart from zero.
    pub fn reset(&mut self) {
        self.total = 0.0;
        self.frame_index = 0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_total_time() {
        let mut clock = FrameClock::new();
        clock.advance(0.1);
        let frame = clock.advance(0.2);
        assert!((frame.total - 0.3).abs() < 1e-6);
        assert_eq!(frame.frame_index, 1);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn clamps_long_stalls() {
        let mut clock = FrameClock::with_max_dt(0.1);
        let frame = clock.advance(5.0);
        assert_eq!(frame.dt, 0.1);
        assert_eq!(clock.total(), 0.1);
    }

    #[test]
    fn negative_delta_counts_as_zero() {
        let mut clock = FrameClock::new();
        let frame = clock.advance(-1.0);
        assert_eq!(frame.dt, 0.0);
        assert_eq!(frame.total, 0.0);
    }

    #[test]
    fn reset_restarts() {
        let mut clock = FrameClock::new();
        clock.advance(0.1);
        clock.reset();
        assert_eq!(clock.total(), 0.0);
        assert_eq!(clock.advance(0.0).frame_index, 0);
    }
}
