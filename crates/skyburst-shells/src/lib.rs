//! Skyburst Shells - what a firework turns into when it bursts
//!
//! Provides:
//! - `ShellConfig` - per-launch shell parameters with sanitization
//! - `ShellGenerator` - trait (and closure impl) producing a burst's particles
//! - `ShellRegistry` - name-keyed generator table, built once and shared via `Arc`
//! - `builtin` - chrysanthemum, ring, palm, willow, crackle, strobe, horsetail,
//!   crossette and heart generators
//! - `children` - crossette splits, crackle sparks and palm trailing sparks

pub mod builtin;
pub mod children;
mod config;
mod registry;

pub use config::{ShellColor, ShellConfig};
pub use registry::{ShellEntry, ShellGenerator, ShellRegistry};
