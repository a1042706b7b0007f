//! Per-step particle bookkeeping

use serde::Serialize;

/// Particle bookkeeping for one simulation step.
///
/// `live_after == live_before + spawned - culled - recycled` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepStats {
    pub live_before: usize,
    pub spawned: usize,
    /// Expired particles plus those released when their burst retired
    pub culled: usize,
    /// Live particles evicted to make room in a full pool
    pub recycled: usize,
    pub live_after: usize,
}

impl StepStats {
    pub fn is_balanced(&self) -> bool {
        self.live_before + self.spawned == self.live_after + self.culled + self.recycled
    }

    /// Fold another step into a running total over an interval
    pub fn accumulate(&mut self, step: &StepStats) {
        if self.spawned == 0 && self.culled == 0 && self.recycled == 0 && self.live_after == 0 {
            self.live_before = step.live_before;
        }
        self.spawned += step.spawned;
        self.culled += step.culled;
        self.recycled += step.recycled;
        self.live_after = step.live_after;
    }
}
