//! Skyburst Particles - particle records and their pool
//!
//! Provides:
//! - `Particle` with a tagged `ParticleKind` (star or spark)
//! - `Trail` - fixed-capacity position history for spark motion blur
//! - `ParticlePool` - generational, fixed-capacity pool with forced recycling
//! - `BurstFlash` - sky-lighting events kept outside the pool
//! - `ParticleInstance` - GPU instance packing for instanced renderers

pub mod flash;
pub mod particle;
pub mod pool;
pub mod trail;

pub use flash::{sky_glow, BurstFlash};
pub use particle::{
    BurstId, Emission, Homing, KindTag, Particle, ParticleInstance, ParticleKind, Secondary,
    Spark, SparkEmitter, Star, StarEffect, ALPHA_EPSILON, RADIUS_FLOOR,
};
pub use pool::{Acquired, ParticleHandle, ParticlePool};
pub use trail::{Trail, TRAIL_CAPACITY};
