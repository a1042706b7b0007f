//! Show files: an `[engine]` table and an optional `[audio]` table

use anyhow::{Context, Result};
use serde::Serialize;
use skyburst_audio::SoundConfig;
use skyburst_engine::EngineConfig;
use std::path::Path;

pub const DEFAULT_WIDTH: f32 = 800.0;
pub const DEFAULT_HEIGHT: f32 = 600.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowFile {
    pub engine: EngineConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<SoundConfig>,
}

impl Default for ShowFile {
    fn default() -> Self {
        Self {
            engine: EngineConfig::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            audio: None,
        }
    }
}

impl ShowFile {
    pub fn parse(content: &str) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(content).context("Invalid TOML")?;

        let engine = table
            .remove("engine")
            .context("Show file has no [engine] table")?;
        // Round-trip through the engine's own loader so missing canvas
        // fields and validation are reported the same way
        let engine = EngineConfig::from_toml_str(&toml::to_string(&engine)?)
            .context("Invalid [engine] table")?;

        let audio = match table.remove("audio") {
            Some(value) => {
                let mut audio: SoundConfig =
                    value.try_into().context("Invalid [audio] table")?;
                audio.validate();
                Some(audio)
            }
            None => None,
        };

        Ok(Self { engine, audio })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read show file '{}'", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to load '{}'", path.display()))
    }

    /// The show at `path`, or the default 800x600 show
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(Path::new(p)),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
