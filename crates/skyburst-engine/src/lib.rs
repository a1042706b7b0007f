//! Skyburst Engine - fixed-step firework simulation
//!
//! Provides:
//! - `Engine` - owns the particle pool and fireworks; `tick`, `step`, `snapshot`
//! - `EngineConfig` / `Quality` - TOML-backed construction parameters
//! - `FrameClock` - 60 Hz accumulator fed by host frame deltas
//! - `Firework`, `FireworkState`, `LaunchConfig` - per-shell lifecycle
//! - `SimEvent` - launch, burst and crackle notifications for sound
//! - `Snapshot`, `StepStats` - read-only views for renderers and tooling

pub mod clock;
pub mod config;
mod engine;
pub mod events;
pub mod firework;
pub mod snapshot;
mod stats;

pub use clock::{FrameClock, MAX_FRAME_MS, STEP_MS};
pub use config::{EngineConfig, Quality};
pub use engine::{Engine, ShellChoice};
pub use events::{EventBus, SimEvent};
pub use firework::{
    Firework, FireworkState, LaunchConfig, ShellPoint, ASCENT_GRAVITY_SCALE, MAX_BURST_STEPS,
};
pub use snapshot::{ParticleView, ShellView, SkyLight, Snapshot};
pub use stats::StepStats;
