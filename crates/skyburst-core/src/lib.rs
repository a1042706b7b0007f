//! Skyburst Core - Foundational types for the firework engine
//!
//! This crate provides the pieces every other Skyburst crate depends on:
//! - `Vec3`, `Color` - Spatial and color types
//! - `SkyRng` - Seedable xorshift PRNG with sphere/ring sampling
//! - `curves` - Interpolation and easing helpers
//! - `ColorTheme` - Named firework palettes
//! - Error types and Result alias

pub mod curves;
mod error;
mod palette;
pub mod rand;
mod types;

pub use error::{Result, SkyburstError};
pub use palette::ColorTheme;
pub use rand::SkyRng;
pub use types::{Color, Vec3};
