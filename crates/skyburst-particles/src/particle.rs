//! Particle types: simulation state and GPU instance data

use crate::trail::Trail;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use skyburst_core::curves::{ease_in_out_cubic, lerp_f32};
use skyburst_core::{Color, SkyRng, Vec3};

/// Particles at or below this alpha are culled
pub const ALPHA_EPSILON: f32 = 1e-4;
/// Particles whose radius shrinks below this are culled
pub const RADIUS_FLOOR: f32 = 0.1;

/// Identifies the burst group a particle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct BurstId(pub u32);

impl BurstId {
    /// Group of particles that have not been handed to a burst yet
    pub const UNASSIGNED: BurstId = BurstId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindTag {
    Star,
    Spark,
}

/// Visibility modulation applied on top of the monotonic alpha decay
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StarEffect {
    #[default]
    None,
    /// Blink with the given period (steps) until `remaining` runs out
    Strobe { period: u16, remaining: u16 },
    /// Drop out of view at random with probability `chance` per step
    Flicker { chance: f32 },
}

/// Children a star produces when its countdown trips
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Secondary {
    /// Crossette: split into `pieces` stars once alpha falls to `at_alpha`
    Split { at_alpha: f32, pieces: u8, kick: f32 },
    /// Nested spark burst when the star expires
    Burst { count: u8, color: Color },
}

/// Periodic trailing-spark emission (palm fronds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkEmitter {
    pub interval: u16,
    pub countdown: u16,
    pub count: u8,
    pub color: Color,
}

impl SparkEmitter {
    pub fn new(interval: u16, count: u8, color: Color) -> Self {
        let interval = interval.max(1);
        Self {
            interval,
            countdown: interval,
            count,
            color,
        }
    }
}

/// Target-trajectory flag: the star eases toward `target` for `steps` steps.
///
/// Each step closes a fraction of the remaining gap. The fraction starts at
/// `ease` and follows a cubic ease up to 1, so the last step lands on target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homing {
    pub target: Vec3,
    /// Steps left
    pub steps: u16,
    pub total: u16,
    pub ease: f32,
}

impl Homing {
    pub fn new(target: Vec3, steps: u16, ease: f32) -> Self {
        let steps = steps.max(1);
        Self {
            target,
            steps,
            total: steps,
            ease: ease.clamp(0.0, 1.0),
        }
    }

    /// Share of the remaining gap closed by the next step
    pub fn pull(&self) -> f32 {
        let total = self.total.max(1) as f32;
        let done = (self.total.saturating_sub(self.steps) + 1) as f32;
        lerp_f32(self.ease, 1.0, ease_in_out_cubic(done / total))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Star {
    pub spin: f32,
    pub homing: Option<Homing>,
    pub effect: StarEffect,
    pub secondary: Option<Secondary>,
    pub emitter: Option<SparkEmitter>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Spark {
    pub trail: Trail,
}

#[derive(Debug, Clone, Copy)]
pub enum ParticleKind {
    Star(Star),
    Spark(Spark),
}

/// What a particle asks the engine to spawn this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Emission {
    Split { pieces: u8, kick: f32 },
    Burst { count: u8, color: Color },
    Sparks { count: u8, color: Color },
}

/// A star or spark record. Owned by the pool slot it occupies.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Color,
    pub alpha: f32,
    pub radius: f32,
    /// Radius lost per step
    pub radius_decay: f32,
    /// Alpha lost per step
    pub decay: f32,
    /// Velocity multiplier per step
    pub drag: f32,
    pub gravity_scale: f32,
    pub rotation: f32,
    /// Steps lived since the burst
    pub age: u32,
    /// Simulation step the particle was spawned on
    pub born: u64,
    pub group: BurstId,
    pub visible: bool,
    pub kind: ParticleKind,
}

impl Particle {
    /// Slot filler for a freshly acquired record
    pub fn blank(tag: KindTag) -> Self {
        let kind = match tag {
            KindTag::Star => ParticleKind::Star(Star::default()),
            KindTag::Spark => ParticleKind::Spark(Spark::default()),
        };
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            color: Color::WHITE,
            alpha: 0.0,
            radius: 0.0,
            radius_decay: 0.0,
            decay: 0.0,
            drag: 1.0,
            gravity_scale: 1.0,
            rotation: 0.0,
            age: 0,
            born: 0,
            group: BurstId::UNASSIGNED,
            visible: true,
            kind,
        }
    }

    pub fn star(position: Vec3, velocity: Vec3, color: Color) -> Self {
        Self {
            position,
            velocity,
            color,
            alpha: 1.0,
            radius: 2.2,
            decay: 0.015,
            drag: 0.98,
            ..Self::blank(KindTag::Star)
        }
    }

    pub fn spark(position: Vec3, velocity: Vec3, color: Color) -> Self {
        Self {
            position,
            velocity,
            color,
            alpha: 1.0,
            radius: 1.0,
            radius_decay: 0.012,
            decay: 0.045,
            drag: 0.99,
            ..Self::blank(KindTag::Spark)
        }
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = decay.max(ALPHA_EPSILON);
        self
    }

    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag.clamp(0.01, 1.0);
        self
    }

    pub fn with_radius(mut self, radius: f32, radius_decay: f32) -> Self {
        self.radius = radius.max(RADIUS_FLOOR);
        self.radius_decay = radius_decay.max(0.0);
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_spin(mut self, spin: f32) -> Self {
        if let ParticleKind::Star(star) = &mut self.kind {
            star.spin = spin;
        }
        self
    }

    pub fn with_effect(mut self, effect: StarEffect) -> Self {
        if let ParticleKind::Star(star) = &mut self.kind {
            star.effect = effect;
        }
        self
    }

    pub fn with_secondary(mut self, secondary: Secondary) -> Self {
        if let ParticleKind::Star(star) = &mut self.kind {
            star.secondary = Some(secondary);
        }
        self
    }

    pub fn with_emitter(mut self, emitter: SparkEmitter) -> Self {
        if let ParticleKind::Star(star) = &mut self.kind {
            star.emitter = Some(emitter);
        }
        self
    }

    pub fn with_homing(mut self, homing: Homing) -> Self {
        if let ParticleKind::Star(star) = &mut self.kind {
            star.homing = Some(homing);
        }
        self
    }

    pub fn kind_tag(&self) -> KindTag {
        match self.kind {
            ParticleKind::Star(_) => KindTag::Star,
            ParticleKind::Spark(_) => KindTag::Spark,
        }
    }

    pub fn trail(&self) -> Option<&Trail> {
        match &self.kind {
            ParticleKind::Spark(spark) => Some(&spark.trail),
            ParticleKind::Star(_) => None,
        }
    }

    /// Alpha a renderer should draw with (0 while strobed out)
    pub fn effective_alpha(&self) -> f32 {
        if self.visible {
            self.alpha
        } else {
            0.0
        }
    }

    pub fn is_expired(&self) -> bool {
        self.alpha <= ALPHA_EPSILON || self.radius < RADIUS_FLOOR
    }

    /// Reset fields that must not leak into the next acquisition
    pub fn clear_transient(&mut self) {
        match &mut self.kind {
            ParticleKind::Star(star) => {
                star.secondary = None;
                star.emitter = None;
                star.homing = None;
                star.effect = StarEffect::None;
            }
            ParticleKind::Spark(spark) => spark.trail.clear(),
        }
        self.visible = true;
    }

    /// Advance one simulation step.
    ///
    /// Motion is always integrated. A `fresh` particle (spawned this step)
    /// skips decay and triggers so its alpha is still 1 on its first frame.
    pub fn advance(
        &mut self,
        gravity: f32,
        record_trail: bool,
        fresh: bool,
        rng: &mut SkyRng,
    ) -> Option<Emission> {
        self.integrate(gravity, record_trail);
        if fresh {
            return None;
        }

        self.age += 1;
        self.alpha = (self.alpha - self.decay).max(0.0);
        self.radius = (self.radius - self.radius_decay).max(0.0);

        let ParticleKind::Star(star) = &mut self.kind else {
            return None;
        };

        self.visible = match &mut star.effect {
            StarEffect::None => true,
            StarEffect::Strobe { period, remaining } => {
                if *remaining == 0 {
                    true
                } else {
                    *remaining -= 1;
                    let half = (*period / 2).max(1) as u32;
                    (self.age / half) % 2 == 0
                }
            }
            StarEffect::Flicker { chance } => !rng.chance(*chance),
        };

        if let Some(Secondary::Split {
            at_alpha,
            pieces,
            kick,
        }) = star.secondary
        {
            if self.alpha <= at_alpha {
                star.secondary = None;
                self.alpha = 0.0;
                return Some(Emission::Split { pieces, kick });
            }
        }

        let expired = self.alpha <= ALPHA_EPSILON || self.radius < RADIUS_FLOOR;

        if let Some(Secondary::Burst { count, color }) = star.secondary {
            if expired {
                star.secondary = None;
                return Some(Emission::Burst { count, color });
            }
        }

        if let Some(emitter) = &mut star.emitter {
            if !expired {
                emitter.countdown = emitter.countdown.saturating_sub(1);
                if emitter.countdown == 0 {
                    emitter.countdown = emitter.interval;
                    return Some(Emission::Sparks {
                        count: emitter.count,
                        color: emitter.color,
                    });
                }
            }
        }

        None
    }

    fn integrate(&mut self, gravity: f32, record_trail: bool) {
        let homing = match &mut self.kind {
            ParticleKind::Star(star) => star.homing.as_mut(),
            ParticleKind::Spark(_) => None,
        };

        if let Some(h) = homing {
            self.velocity = (h.target - self.position) * h.pull();
            h.steps = h.steps.saturating_sub(1);
            if h.steps == 0 {
                if let ParticleKind::Star(star) = &mut self.kind {
                    star.homing = None;
                }
            }
        } else {
            self.velocity.y += gravity * self.gravity_scale;
            self.velocity *= self.drag;
        }

        match &mut self.kind {
            ParticleKind::Spark(spark) if record_trail => spark.trail.push(self.position),
            ParticleKind::Star(star) => self.rotation += star.spin,
            _ => {}
        }

        self.position += self.velocity;
    }
}

/// GPU instance data, 48 bytes (3 rows of vec4)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    /// xyz = position, w = radius
    pub pos_size: [f32; 4],
    /// rgb, a = effective alpha
    pub color: [f32; 4],
    /// x = rotation, y = kind (0 star, 1 spark, 2 rising shell), z = age, w = reserved
    pub rotation_kind: [f32; 4],
}

impl ParticleInstance {
    pub fn from_particle(p: &Particle) -> Self {
        let kind = match p.kind_tag() {
            KindTag::Star => 0.0,
            KindTag::Spark => 1.0,
        };
        Self {
            pos_size: [p.position.x, p.position.y, p.position.z, p.radius],
            color: [p.color.r, p.color.g, p.color.b, p.effective_alpha()],
            rotation_kind: [p.rotation, kind, p.age as f32, 0.0],
        }
    }

    /// A rising shell, drawn as a bright point
    pub fn shell_point(position: Vec3, radius: f32, color: Color) -> Self {
        Self {
            pos_size: [position.x, position.y, position.z, radius],
            color: [color.r, color.g, color.b, 1.0],
            rotation_kind: [0.0, 2.0, 0.0, 0.0],
        }
    }
}
