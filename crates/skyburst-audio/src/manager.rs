//! Sound manager: event-driven playback with volume, mute and disposal

use crate::bank::{scan_dir, SoundBank, SoundCategory};
use crate::config::SoundConfig;
use crate::engine::{stop_tween, AudioEngine};
use crate::trigger::SoundTrigger;
use kira::sound::static_sound::StaticSoundHandle;
use kira::sound::PlaybackState;
use skyburst_core::{Result, SkyRng};
use skyburst_engine::SimEvent;
use std::path::Path;

const RATE_SEED: u64 = 0x50_0D;

/// Plays category sounds for simulation events.
///
/// Every failure stays inside the manager: it is logged and the show goes on
/// without that sound.
pub struct SoundManager {
    engine: AudioEngine,
    bank: SoundBank,
    trigger: SoundTrigger,
    volume: f64,
    muted: bool,
    rate_range: [f64; 2],
    playing: Vec<StaticSoundHandle>,
    rng: SkyRng,
}

impl SoundManager {
    /// Open the default device (unless disabled) and load `sound_dir`
    pub fn new(config: SoundConfig) -> Self {
        let engine = if config.enabled {
            AudioEngine::new()
        } else {
            AudioEngine::silent()
        };
        Self::with_engine(engine, config)
    }

    /// A manager with no device; sounds still load into the bank
    pub fn silent(config: SoundConfig) -> Self {
        Self::with_engine(AudioEngine::silent(), config)
    }

    fn with_engine(engine: AudioEngine, mut config: SoundConfig) -> Self {
        config.validate();
        let mut manager = Self {
            engine,
            bank: SoundBank::new(),
            trigger: SoundTrigger::from_config(&config),
            volume: config.volume,
            muted: config.muted,
            rate_range: config.rate_range,
            playing: Vec::new(),
            rng: SkyRng::new(RATE_SEED),
        };
        if let Some(dir) = &config.sound_dir {
            if let Err(e) = manager.load_dir(dir) {
                tracing::warn!(dir = %dir.display(), error = %e, "could not load sounds");
            }
        }
        manager
    }

    /// Load every category sound in `dir`; returns how many loaded.
    ///
    /// Files that fail to decode are skipped with a warning.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut loaded = 0;
        for file in scan_dir(dir)? {
            match self.engine.load_sound(&file.name, &file.path) {
                Ok(()) => {
                    self.bank.add(file.category, file.name);
                    loaded += 1;
                }
                Err(e) => tracing::warn!(error = %e, "skipping sound"),
            }
        }
        tracing::info!(dir = %dir.display(), loaded, "sound bank loaded");
        Ok(loaded)
    }

    /// Start one random sound from `category`; true if something began playing
    pub fn play_category(&mut self, category: SoundCategory) -> bool {
        if self.muted || self.volume <= 0.0 {
            return false;
        }
        let Some(name) = self.bank.pick(category, &mut self.rng) else {
            return false;
        };
        let [lo, hi] = self.rate_range;
        let rate = self.rng.range(lo as f32, hi as f32) as f64;

        match self.engine.play_non_spatial(name, self.volume, rate) {
            Ok(Some(handle)) => {
                self.playing.push(handle);
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(category = category.name(), error = %e, "playback failed");
                false
            }
        }
    }

    /// Play the category for each event; returns how many sounds started
    pub fn process_events(&mut self, events: &[SimEvent]) -> usize {
        let categories = self.trigger.process_events(events);
        categories
            .into_iter()
            .filter(|&c| self.play_category(c))
            .count()
    }

    /// Drop handles of sounds that finished
    pub fn update(&mut self) {
        self.playing
            .retain(|handle| !matches!(handle.state(), PlaybackState::Stopped));
    }

    /// Applies to sounds started from now on
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 2.0)
        } else {
            0.0
        };
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_available()
    }

    pub fn bank(&self) -> &SoundBank {
        &self.bank
    }

    /// Sounds started and not yet pruned by `update`
    pub fn in_flight(&self) -> usize {
        self.playing.len()
    }

    /// Stop everything still playing
    pub fn dispose(&mut self) {
        let tween = stop_tween();
        for handle in &mut self.playing {
            let _ = handle.stop(tween);
        }
        self.playing.clear();
    }
}

impl Drop for SoundManager {
    fn drop(&mut self) {
        self.dispose();
    }
}
