//! Event-driven sound selection
//!
//! Maps simulation events to sound categories.

use crate::bank::SoundCategory;
use crate::config::SoundConfig;
use skyburst_engine::SimEvent;

/// Chooses a category for each simulation event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundTrigger {
    pub small_burst_below: usize,
    pub small_crackle_below: usize,
}

impl Default for SoundTrigger {
    fn default() -> Self {
        Self::from_config(&SoundConfig::default())
    }
}

impl SoundTrigger {
    pub fn from_config(config: &SoundConfig) -> Self {
        Self {
            small_burst_below: config.small_burst_below,
            small_crackle_below: config.small_crackle_below,
        }
    }

    pub fn category_for(&self, event: &SimEvent) -> SoundCategory {
        match event {
            SimEvent::Launch { .. } => SoundCategory::Lift,
            SimEvent::Burst { count, .. } if *count < self.small_burst_below => {
                SoundCategory::BurstSmall
            }
            SimEvent::Burst { .. } => SoundCategory::Burst,
            SimEvent::Crackle { count, .. } if *count < self.small_crackle_below => {
                SoundCategory::CrackleSmall
            }
            SimEvent::Crackle { .. } => SoundCategory::Crackle,
        }
    }

    /// One category per event, in event order
    pub fn process_events(&self, events: &[SimEvent]) -> Vec<SoundCategory> {
        events.iter().map(|e| self.category_for(e)).collect()
    }
}
