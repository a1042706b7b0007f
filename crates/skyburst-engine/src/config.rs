//! Engine configuration (TOML, serde defaults per field)

use serde::{Deserialize, Serialize};
use skyburst_core::{ColorTheme, Result, SkyburstError};
use std::path::Path;

/// Rendering budget tier; unknown names read as `Normal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Quality {
    Low,
    #[default]
    Normal,
    High,
}

impl Quality {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "low" => Quality::Low,
            "normal" => Quality::Normal,
            "high" => Quality::High,
            other => {
                tracing::warn!(quality = other, "unknown quality tier, using normal");
                Quality::Normal
            }
        }
    }

    pub fn pool_capacity(&self) -> usize {
        match self {
            Quality::Low => 1_000,
            Quality::Normal => 3_000,
            Quality::High => 8_000,
        }
    }

    pub fn sky_lighting(&self) -> bool {
        !matches!(self, Quality::Low)
    }

    pub fn spark_trails(&self) -> bool {
        matches!(self, Quality::High)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Normal => "normal",
            Quality::High => "high",
        }
    }
}

impl From<String> for Quality {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

/// Everything the engine needs at construction.
///
/// Canvas size is required; every other field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub quality: Quality,
    /// Pixels per step squared
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Autoplay launch-rate multiplier
    #[serde(default = "default_one")]
    pub density: f32,
    /// Scales star count and burst speed
    #[serde(default = "default_one")]
    pub shell_size: f32,
    #[serde(default)]
    pub theme: ColorTheme,
    #[serde(default = "default_true")]
    pub autoplay: bool,
    /// Registered shell name, or "random"
    #[serde(default = "default_shell_type")]
    pub shell_type: String,
    /// Autoplay interval bounds in milliseconds, before density scaling
    #[serde(default = "default_launch_interval")]
    pub launch_interval_ms: [f32; 2],
    /// Apex height band as fractions of the canvas height, measured from the top
    #[serde(default = "default_apex_range")]
    pub apex_range: [f32; 2],
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Overrides the quality tier's pool capacity
    #[serde(default)]
    pub max_particles: Option<usize>,
    /// Overrides the quality tier's sky lighting
    #[serde(default)]
    pub sky_lighting: Option<bool>,
}

fn default_gravity() -> f32 {
    0.06
}

fn default_one() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_shell_type() -> String {
    "random".to_string()
}

fn default_launch_interval() -> [f32; 2] {
    [900.0, 2200.0]
}

fn default_apex_range() -> [f32; 2] {
    [0.15, 0.45]
}

fn default_seed() -> u64 {
    0x5EED
}

impl EngineConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            quality: Quality::default(),
            gravity: default_gravity(),
            density: default_one(),
            shell_size: default_one(),
            theme: ColorTheme::default(),
            autoplay: default_true(),
            shell_type: default_shell_type(),
            launch_interval_ms: default_launch_interval(),
            apex_range: default_apex_range(),
            seed: default_seed(),
            max_particles: None,
            sky_lighting: None,
        }
    }

    /// Parse and validate a config table
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        for field in ["width", "height"] {
            if !table.contains_key(field) {
                return Err(SkyburstError::MissingRequiredField(field.to_string()));
            }
        }
        let mut config: EngineConfig = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn pool_capacity(&self) -> usize {
        self.max_particles
            .unwrap_or_else(|| self.quality.pool_capacity())
    }

    pub fn sky_lighting_enabled(&self) -> bool {
        self.sky_lighting
            .unwrap_or_else(|| self.quality.sky_lighting())
    }

    pub fn spark_trails(&self) -> bool {
        self.quality.spark_trails()
    }

    /// Reject an unusable canvas; correct everything else with a warning
    pub fn validate(&mut self) -> Result<()> {
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SkyburstError::ValueOutOfRange {
                    field: field.to_string(),
                    min: f64::MIN_POSITIVE,
                    max: f64::MAX,
                    value: value as f64,
                });
            }
        }

        if !self.gravity.is_finite() || self.gravity < 0.0 {
            tracing::warn!(gravity = self.gravity, "invalid gravity, using default");
            self.gravity = default_gravity();
        }

        if !self.density.is_finite() || !(0.1..=5.0).contains(&self.density) {
            let fixed = if self.density.is_finite() {
                self.density.clamp(0.1, 5.0)
            } else {
                default_one()
            };
            tracing::warn!(density = self.density, fixed, "density out of range");
            self.density = fixed;
        }

        if !self.shell_size.is_finite() || !(0.25..=4.0).contains(&self.shell_size) {
            let fixed = if self.shell_size.is_finite() {
                self.shell_size.clamp(0.25, 4.0)
            } else {
                default_one()
            };
            tracing::warn!(shell_size = self.shell_size, fixed, "shell_size out of range");
            self.shell_size = fixed;
        }

        let [min, max] = self.launch_interval_ms;
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || max <= 0.0 {
            tracing::warn!(interval = ?self.launch_interval_ms, "invalid launch interval, using default");
            self.launch_interval_ms = default_launch_interval();
        } else if min > max {
            tracing::warn!(min, max, "launch interval reversed, swapping");
            self.launch_interval_ms = [max, min];
        }

        let [lo, hi] = self.apex_range;
        if !lo.is_finite() || !hi.is_finite() {
            tracing::warn!("invalid apex range, using default");
            self.apex_range = default_apex_range();
        } else {
            let lo = lo.clamp(0.05, 0.95);
            let hi = hi.clamp(0.05, 0.95);
            let fixed = if lo <= hi { [lo, hi] } else { [hi, lo] };
            if fixed != self.apex_range {
                tracing::warn!(apex_range = ?self.apex_range, ?fixed, "apex range corrected");
                self.apex_range = fixed;
            }
        }

        if self.max_particles == Some(0) {
            tracing::warn!("max_particles must be at least 1, using 1");
            self.max_particles = Some(1);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_fills_defaults() {
        let config = EngineConfig::from_toml_str("width = 800\nheight = 600").unwrap();
        assert_eq!(config, EngineConfig::new(800.0, 600.0));
        assert_eq!(config.pool_capacity(), 3_000);
        assert!(config.sky_lighting_enabled());
        assert!(!config.spark_trails());
    }

    #[test]
    fn full_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            width = 1280.0
            height = 720.0
            quality = "high"
            gravity = 0.08
            density = 2.0
            theme = "neon"
            autoplay = false
            shell_type = "willow"
            launch_interval_ms = [500.0, 800.0]
            seed = 99
            max_particles = 500
            sky_lighting = false
            "#,
        )
        .unwrap();
        assert_eq!(config.quality, Quality::High);
        assert_eq!(config.theme, ColorTheme::Neon);
        assert_eq!(config.shell_type, "willow");
        assert_eq!(config.pool_capacity(), 500);
        assert!(!config.sky_lighting_enabled());
        assert!(config.spark_trails());
    }

    #[test]
    fn missing_size_is_fatal() {
        let err = EngineConfig::from_toml_str("width = 800").unwrap_err();
        assert!(matches!(err, SkyburstError::MissingRequiredField(ref f) if f == "height"));
    }

    #[test]
    fn non_positive_size_is_fatal() {
        let err = EngineConfig::from_toml_str("width = 0\nheight = 600").unwrap_err();
        assert!(matches!(err, SkyburstError::ValueOutOfRange { ref field, .. } if field == "width"));
    }

    #[test]
    fn unparsable_toml_is_fatal() {
        let err = EngineConfig::from_toml_str("width = = 3").unwrap_err();
        assert!(matches!(err, SkyburstError::TomlParseError(_)));
    }

    #[test]
    fn unknown_theme_and_quality_fall_back() {
        let config = EngineConfig::from_toml_str(
            "width = 800\nheight = 600\ntheme = \"sunset\"\nquality = \"ultra\"",
        )
        .unwrap();
        assert_eq!(config.theme, ColorTheme::Classic);
        assert_eq!(config.quality, Quality::Normal);

        let config =
            EngineConfig::from_toml_str("width = 800\nheight = 600\nquality = \"LOW\"").unwrap();
        assert_eq!(config.quality, Quality::Low);
    }

    #[test]
    fn soft_errors_are_corrected() {
        let mut config = EngineConfig::new(800.0, 600.0);
        config.gravity = -1.0;
        config.density = 50.0;
        config.shell_size = 0.0;
        config.launch_interval_ms = [2000.0, 100.0];
        config.apex_range = [0.9, 0.0];
        config.max_particles = Some(0);
        config.validate().unwrap();

        assert_eq!(config.gravity, 0.06);
        assert_eq!(config.density, 5.0);
        assert_eq!(config.shell_size, 0.25);
        assert_eq!(config.launch_interval_ms, [100.0, 2000.0]);
        assert_eq!(config.apex_range, [0.05, 0.9]);
        assert_eq!(config.max_particles, Some(1));
    }

    #[test]
    fn toml_round_trip() {
        let config = EngineConfig::new(640.0, 480.0);
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn quality_tiers() {
        assert_eq!(Quality::Low.pool_capacity(), 1_000);
        assert!(!Quality::Low.sky_lighting());
        assert!(Quality::Normal.sky_lighting());
        assert!(!Quality::Normal.spark_trails());
        assert!(Quality::High.spark_trails());
    }
}
