//! Sound configuration (the `[audio]` show-file table)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The `[audio]` table of a show file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    /// When false no device is opened
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Linear amplitude, 0 to 2
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default)]
    pub muted: bool,
    /// Directory scanned for `<category>*.{ogg,wav,mp3,flac}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_dir: Option<PathBuf>,
    /// Playback rate is drawn from this range for every sound
    #[serde(default = "default_rate_range")]
    pub rate_range: [f64; 2],
    /// Bursts with fewer stars use `burst_small`
    #[serde(default = "default_small_burst")]
    pub small_burst_below: usize,
    /// Crackle pops with fewer sparks use `crackle_small`
    #[serde(default = "default_small_crackle")]
    pub small_crackle_below: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_volume() -> f64 {
    0.8
}

fn default_rate_range() -> [f64; 2] {
    [0.9, 1.1]
}

fn default_small_burst() -> usize {
    40
}

fn default_small_crackle() -> usize {
    6
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            volume: default_volume(),
            muted: false,
            sound_dir: None,
            rate_range: default_rate_range(),
            small_burst_below: default_small_burst(),
            small_crackle_below: default_small_crackle(),
        }
    }
}

impl SoundConfig {
    /// Clamp out-of-range values, logging each correction
    pub fn validate(&mut self) {
        if !self.volume.is_finite() || !(0.0..=2.0).contains(&self.volume) {
            let fixed = if self.volume.is_finite() {
                self.volume.clamp(0.0, 2.0)
            } else {
                default_volume()
            };
            tracing::warn!(volume = self.volume, fixed, "volume out of range");
            self.volume = fixed;
        }
        let [lo, hi] = self.rate_range;
        if !(lo > 0.0 && hi > 0.0 && lo.is_finite() && hi.is_finite()) {
            tracing::warn!(lo, hi, "invalid playback rate range, using default");
            self.rate_range = default_rate_range();
        } else if lo > hi {
            tracing::warn!(lo, hi, "playback rate range reversed");
            self.rate_range = [hi, lo];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_table() {
        let config: SoundConfig = toml::from_str("").unwrap();
        assert_eq!(config, SoundConfig::default());
        assert!(config.enabled);
        assert_eq!(config.rate_range, [0.9, 1.1]);
    }

    #[test]
    fn parses_overrides() {
        let config: SoundConfig = toml::from_str(
            r#"
            volume = 0.5
            muted = true
            sound_dir = "assets/sounds"
            small_burst_below = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.volume, 0.5);
        assert!(config.muted);
        assert_eq!(config.sound_dir, Some(PathBuf::from("assets/sounds")));
        assert_eq!(config.small_burst_below, 30);
        assert_eq!(config.small_crackle_below, 6);
    }

    #[test]
    fn validate_corrects_values() {
        let mut config = SoundConfig {
            volume: 5.0,
            rate_range: [1.2, 0.8],
            ..Default::default()
        };
        config.validate();
        assert_eq!(config.volume, 2.0);
        assert_eq!(config.rate_range, [0.8, 1.2]);

        config.rate_range = [0.0, 1.0];
        config.volume = f64::NAN;
        config.validate();
        assert_eq!(config.rate_range, [0.9, 1.1]);
        assert_eq!(config.volume, 0.8);
    }
}
