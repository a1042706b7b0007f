//! Per-firework lifecycle: scheduled, rising, bursting, fading

use skyburst_core::Vec3;
use skyburst_particles::BurstId;
use skyburst_shells::ShellConfig;
use std::sync::Arc;

/// Ascent gravity relative to star gravity
pub const ASCENT_GRAVITY_SCALE: f32 = 0.8;
/// A burst is retired after this many steps even with survivors
pub const MAX_BURST_STEPS: u32 = 900;
/// Ascent length when gravity is zero
const FLOAT_ASCENT_STEPS: u32 = 90;

/// One shell to fire
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub origin_x: f32,
    /// Canvas y the shell should peak at
    pub apex_y: f32,
    /// Multiplier on the speed that exactly reaches the apex
    pub ascent_speed: f32,
    pub shell: Arc<ShellConfig>,
}

/// The rising shell before it bursts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellPoint {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Steps left before forced detonation
    pub fuse: u32,
}

impl ShellPoint {
    /// Place a shell at the bottom of the canvas aimed at `launch.apex_y`
    pub fn ignite(launch: &LaunchConfig, ground_y: f32, gravity: f32) -> Self {
        let height = (ground_y - launch.apex_y).max(1.0);
        let g = gravity * ASCENT_GRAVITY_SCALE;
        let (speed, fuse) = if g > f32::EPSILON {
            let v0 = (2.0 * g * height).sqrt();
            (v0, (v0 / g).ceil().max(1.0) as u32)
        } else {
            (height / FLOAT_ASCENT_STEPS as f32, FLOAT_ASCENT_STEPS)
        };
        Self {
            position: Vec3::planar(launch.origin_x, ground_y),
            velocity: Vec3::planar(0.0, -speed * launch.ascent_speed),
            fuse,
        }
    }

    /// Advance one step; true when the shell should burst
    pub fn rise(&mut self, gravity: f32) -> bool {
        self.velocity.y += gravity * ASCENT_GRAVITY_SCALE;
        self.position += self.velocity;
        self.fuse = self.fuse.saturating_sub(1);
        self.velocity.y >= 0.0 || self.fuse == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FireworkState {
    /// Waiting for simulation time `at_ms`
    Scheduled { at_ms: f64 },
    Ascending(ShellPoint),
    /// Transient: the engine generates the burst within the same step
    Exploding { at: Vec3 },
    /// Stars are live in the pool under this firework's group
    Decaying { steps: u32 },
    Retired,
}

impl FireworkState {
    pub fn name(&self) -> &'static str {
        match self {
            FireworkState::Scheduled { .. } => "scheduled",
            FireworkState::Ascending(_) => "ascending",
            FireworkState::Exploding { .. } => "exploding",
            FireworkState::Decaying { .. } => "decaying",
            FireworkState::Retired => "retired",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Firework {
    /// Also the burst group of its stars
    pub id: BurstId,
    pub launch: LaunchConfig,
    pub state: FireworkState,
}

impl Firework {
    pub fn scheduled(id: BurstId, launch: LaunchConfig, at_ms: f64) -> Self {
        Self {
            id,
            launch,
            state: FireworkState::Scheduled { at_ms },
        }
    }

    /// Counts toward the autoplay limit
    pub fn is_active(&self) -> bool {
        !matches!(
            self.state,
            FireworkState::Scheduled { .. } | FireworkState::Retired
        )
    }

    pub fn is_retired(&self) -> bool {
        matches!(self.state, FireworkState::Retired)
    }
}
