//! Audio engine wrapping Kira's AudioManager
//!
//! Caches decoded sounds by name and plays one-shots on the main track.
//! Degrades gracefully when no audio device is available.

use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::{AudioManager, DefaultBackend, Tween};
use skyburst_core::{Result, SkyburstError};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Fade applied when cutting a sound short
pub(crate) fn stop_tween() -> Tween {
    Tween {
        duration: Duration::from_millis(16),
        ..Default::default()
    }
}

/// Wraps Kira's AudioManager with a sound cache
pub struct AudioEngine {
    manager: Option<AudioManager<DefaultBackend>>,
    sound_cache: HashMap<String, StaticSoundData>,
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEngine {
    pub fn new() -> Self {
        let manager = AudioManager::<DefaultBackend>::new(kira::AudioManagerSettings::default())
            .map_err(|e| tracing::warn!(error = %e, "no audio device available, running silent"))
            .ok();

        Self {
            manager,
            sound_cache: HashMap::new(),
        }
    }

    /// An engine that never opens a device; sounds still load and cache
    pub fn silent() -> Self {
        Self {
            manager: None,
            sound_cache: HashMap::new(),
        }
    }

    /// Whether audio is actually available
    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }

    /// Load a sound file into the cache
    pub fn load_sound(&mut self, name: &str, path: &Path) -> Result<()> {
        if self.sound_cache.contains_key(name) {
            return Ok(());
        }

        let sound_data = StaticSoundData::from_file(path).map_err(|e| {
            SkyburstError::AudioError(format!("Failed to load '{}': {}", path.display(), e))
        })?;

        self.sound_cache.insert(name.to_string(), sound_data);
        Ok(())
    }

    /// Play a cached sound on the main track.
    ///
    /// Returns `Ok(None)` when running silent. Every call starts a new
    /// playback, so overlapping sounds never cut each other off.
    pub fn play_non_spatial(
        &mut self,
        sound_name: &str,
        volume: f64,
        rate: f64,
    ) -> Result<Option<StaticSoundHandle>> {
        let manager = match &mut self.manager {
            Some(m) => m,
            None => return Ok(None),
        };

        let sound_data = self
            .sound_cache
            .get(sound_name)
            .ok_or_else(|| SkyburstError::AudioError(format!("Sound not cached: {sound_name}")))?
            .clone();

        let data = sound_data
            .volume(amplitude_to_db(volume))
            .playback_rate(kira::PlaybackRate(rate));

        let handle = manager
            .play(data)
            .map_err(|e| SkyburstError::AudioError(format!("Failed to play '{sound_name}': {e}")))?;

        Ok(Some(handle))
    }

    pub fn has_sound(&self, name: &str) -> bool {
        self.sound_cache.contains_key(name)
    }

    pub fn sound_count(&self) -> usize {
        self.sound_cache.len()
    }
}

/// Convert linear amplitude (0.0–2.0) to decibels
pub(crate) fn amplitude_to_db(amplitude: f64) -> kira::Decibels {
    if amplitude <= 0.0 {
        kira::Decibels(-60.0) // silence
    } else {
        kira::Decibels((20.0 * (amplitude as f32).log10()).max(-60.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_engine_plays_nothing() {
        let mut engine = AudioEngine::silent();
        assert!(!engine.is_available());
        let handle = engine.play_non_spatial("burst", 1.0, 1.0).unwrap();
        assert!(handle.is_none());
    }

    #[test]
    fn missing_file_is_an_audio_error() {
        let mut engine = AudioEngine::silent();
        let err = engine
            .load_sound("lift", Path::new("/nonexistent/lift.ogg"))
            .unwrap_err();
        assert!(matches!(err, SkyburstError::AudioError(_)));
        assert!(!engine.has_sound("lift"));
        assert_eq!(engine.sound_count(), 0);
    }

    #[test]
    fn amplitude_conversion() {
        assert_eq!(amplitude_to_db(0.0).0, -60.0);
        assert_eq!(amplitude_to_db(-1.0).0, -60.0);
        assert!(amplitude_to_db(1.0).0.abs() < 1e-5);
        assert!((amplitude_to_db(0.5).0 + 6.0206).abs() < 1e-3);
        assert_eq!(amplitude_to_db(1e-9).0, -60.0);
    }
}
