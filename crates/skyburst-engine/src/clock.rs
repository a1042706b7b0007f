//! Frame clock with fixed-step accumulator

/// One simulation step: a 60 Hz frame
pub const STEP_MS: f64 = 1000.0 / 60.0;
/// Longest frame the clock will account for
pub const MAX_FRAME_MS: f64 = 250.0;

/// Turns host frame deltas into whole simulation steps
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Total wall time fed in, after clamping
    pub total_ms: f64,
    /// Last clamped frame delta
    pub delta_ms: f64,
    pub step_ms: f64,
    accumulator: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_ms: 0.0,
            delta_ms: 0.0,
            step_ms: STEP_MS,
            accumulator: 0.0,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one host frame. Negative or NaN deltas count as zero.
    pub fn advance(&mut self, delta_ms: f64) {
        // Clamp so a stalled tab doesn't replay seconds of simulation
        let delta = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        self.delta_ms = delta;
        self.total_ms += delta;
        self.accumulator += delta;
    }

    pub fn should_step(&self) -> bool {
        self.accumulator >= self.step_ms
    }

    pub fn consume_step(&mut self) {
        self.accumulator -= self.step_ms;
    }

    /// Fraction of a step left over, for render interpolation
    pub fn interpolation_alpha(&self) -> f64 {
        self.accumulator / self.step_ms
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let clock = FrameClock::new();
        assert!((clock.step_ms - 1000.0 / 60.0).abs() < 1e-10);
        assert_eq!(clock.total_ms, 0.0);
        assert!(!clock.should_step());
    }

    #[test]
    fn accumulates_whole_steps() {
        let mut clock = FrameClock::new();
        clock.advance(STEP_MS * 2.5);
        let mut steps = 0;
        while clock.should_step() {
            clock.consume_step();
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert!((clock.interpolation_alpha() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(10_000.0);
        assert_eq!(clock.delta_ms, MAX_FRAME_MS);
        let mut steps = 0;
        while clock.should_step() {
            clock.consume_step();
            steps += 1;
        }
        // 250 ms is 15 steps, minus rounding in the accumulator
        assert!((14..=15).contains(&steps));
    }

    #[test]
    fn bad_deltas_are_ignored() {
        let mut clock = FrameClock::new();
        clock.advance(-5.0);
        clock.advance(f64::NAN);
        assert_eq!(clock.total_ms, 0.0);
    }
}
