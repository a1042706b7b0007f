//! Skyburst Audio - Firework sounds (Kira backend)
//!
//! Provides:
//! - `AudioEngine` - wraps Kira's AudioManager and a decoded sound cache
//! - `SoundBank`, `SoundCategory` - named sound pools loaded from a directory
//! - `SoundTrigger` - maps `SimEvent`s to categories
//! - `SoundManager` - random pick and pitch per sound, volume and mute, disposal
//! - `SoundConfig` - the `[audio]` table of a show file

pub mod bank;
mod config;
pub mod engine;
mod manager;
pub mod trigger;

pub use bank::{SoundBank, SoundCategory};
pub use config::SoundConfig;
pub use engine::AudioEngine;
pub use manager::SoundManager;
pub use trigger::SoundTrigger;
