//! Built-in shell generators
//!
//! Every generator returns exactly `config.particle_count` stars centred on
//! `origin`. Directions are sampled in 3D; renderers drop `z`.

use crate::config::ShellConfig;
use skyburst_core::curves::whiten;
use skyburst_core::{SkyRng, Vec3};
use skyburst_particles::{Homing, Particle, Secondary, SparkEmitter, StarEffect};
use std::f32::consts::TAU;

/// Per-star speed variation around a shell's base speed
pub const SPEED_JITTER: f32 = 0.08;
/// Pistil stars fly at this fraction of the shell speed
pub const PISTIL_SPEED: f32 = 0.45;
/// Steps heart stars spend easing onto the outline
pub const HEART_FORM_STEPS: u16 = 36;

/// Apply the config's overrides on top of a generator's star defaults
fn finish(p: Particle, config: &ShellConfig) -> Particle {
    let p = match config.decay {
        Some(decay) => p.with_decay(decay),
        None => p,
    };
    let p = match config.drag {
        Some(drag) => p.with_drag(drag),
        None => p,
    };
    let scale = p.gravity_scale * config.gravity_multiplier;
    p.with_gravity_scale(scale)
}

fn base_speed(config: &ShellConfig, rng: &mut SkyRng) -> f32 {
    rng.range(config.speed_min, config.speed_max)
}

fn jittered(base: f32, rng: &mut SkyRng) -> f32 {
    base * rng.range(1.0 - SPEED_JITTER, 1.0 + SPEED_JITTER)
}

/// Sphere of stars at one speed; a pistil color puts a quarter of them in a
/// slower inner burst.
pub fn chrysanthemum(origin: Vec3, config: &ShellConfig, rng: &mut SkyRng) -> Vec<Particle> {
    let count = config.particle_count as usize;
    let pistil_count = if config.pistil.is_some() { count / 4 } else { 0 };
    let base = base_speed(config, rng);

    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let dir = rng.random_direction();
        let speed = jittered(base, rng);
        let star = match config.pistil {
            Some(pistil) if i < pistil_count => {
                Particle::star(origin, dir * (speed * PISTIL_SPEED), pistil).with_radius(1.8, 0.0)
            }
            _ => Particle::star(origin, dir * speed, config.color.pick(rng)),
        };
        out.push(finish(star, config));
    }
    out
}

/// Great circle of a random plane, tilted out of plane by at most `spread`
pub fn ring(origin: Vec3, config: &ShellConfig, rng: &mut SkyRng) -> Vec<Particle> {
    let count = config.particle_count as usize;
    // Favor planes facing the viewer so most rings read as rings
    let normal = rng.cone_direction(Vec3::new(0.0, 0.0, 1.0), 60.0);
    let u = normal.any_perpendicular();
    let w = normal.cross(&u).normalized();
    let speed = base_speed(config, rng);
    let offset = rng.angle();
    let band = config.spread.to_radians();

    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let a = offset + TAU * i as f32 / count as f32;
        let tilt = if band > 0.0 { rng.range(-band, band) } else { 0.0 };
        let in_plane = u * a.cos() + w * a.sin();
        let dir = in_plane * tilt.cos() + normal * tilt.sin();
        let star = Particle::star(origin, dir * speed, config.color.pick(rng)).with_decay(0.015);
        out.push(finish(star, config));
    }
    out
}

/// Heavy, long-lived fronds shedding sparks as they fall
pub fn palm(origin: Vec3, config: &ShellConfig, rng: &mut SkyRng) -> Vec<Particle> {
    let count = config.particle_count as usize;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let dir = rng.random_direction();
        let speed = base_speed(config, rng);
        let color = config.color.pick(rng);
        let star = Particle::star(origin, dir * speed, color)
            .with_radius(3.0, 0.0)
            .with_decay(0.009)
            .with_drag(0.97)
            .with_gravity_scale(1.2)
            .with_emitter(SparkEmitter::new(4, 1, whiten(color, 0.5)));
        out.push(finish(star, config));
    }
    out
}

/// Slow, drooping gold stars trailing sparks
pub fn willow(origin: Vec3, config: &ShellConfig, rng: &mut SkyRng) -> Vec<Particle> {
    let count = config.particle_count as usize;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let dir = rng.random_direction();
        let speed = base_speed(config, rng);
        let color = config.color.pick(rng);
        let star = Particle::star(origin, dir * speed, color)
            .with_radius(1.8, 0.0)
            .with_decay(0.006)
            .with_drag(0.955)
            .with_gravity_scale(0.5)
            .with_emitter(SparkEmitter::new(6, 1, whiten(color, 0.3)));
        out.push(finish(star, config));
    }
    out
}

/// Short flickering stars that pop into crackle sparks on expiry
pub fn crackle(origin: Vec3, config: &ShellConfig, rng: &mut SkyRng) -> Vec<Particle> {
    let count = config.particle_count as usize;
    let base = base_speed(config, rng);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let dir = rng.random_direction();
        let speed = jittered(base, rng);
        let color = config.color.pick(rng);
        let sparks = rng.int_range(4, 7) as u8;
        let star = Particle::star(origin, dir * speed, color)
            .with_decay(0.03)
            .with_effect(StarEffect::Flicker { chance: 0.25 })
            .with_secondary(Secondary::Burst {
                count: sparks,
                color: whiten(color, 0.6),
            });
        out.push(finish(star, config));
    }
    out
}

/// Stars that blink for a while before burning out
pub fn strobe(origin: Vec3, config: &ShellConfig, rng: &mut SkyRng) -> Vec<Particle> {
    let count = config.particle_count as usize;
    let base = base_speed(config, rng);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let dir = rng.random_direction();
        let speed = jittered(base, rng);
        let effect = StarEffect::Strobe {
            period: rng.int_range(6, 10) as u16,
            remaining: rng.int_range(40, 70) as u16,
        };
        let star = Particle::star(origin, dir * speed, config.color.pick(rng))
            .with_decay(0.012)
            .with_effect(effect);
        out.push(finish(star, config));
    }
    out
}

/// Upward cone of heavy stars that fall back as a tail
pub fn horsetail(origin: Vec3, config: &ShellConfig, rng: &mut SkyRng) -> Vec<Particle> {
    let count = config.particle_count as usize;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let dir = rng.cone_direction(Vec3::UP, config.spread);
        let speed = base_speed(config, rng);
        let star = Particle::star(origin, dir * speed, config.color.pick(rng))
            .with_decay(0.011)
            .with_drag(0.985)
            .with_gravity_scale(2.5);
        out.push(finish(star, config));
    }
    out
}

/// Stars that split into 2-4 pieces at half brightness
pub fn crossette(origin: Vec3, config: &ShellConfig, rng: &mut SkyRng) -> Vec<Particle> {
    let count = config.particle_count as usize;
    let base = base_speed(config, rng);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let dir = rng.random_direction();
        let speed = jittered(base, rng);
        let split = Secondary::Split {
            at_alpha: 0.5,
            pieces: rng.int_range(2, 4) as u8,
            kick: speed * 0.35,
        };
        let star = Particle::star(origin, dir * speed, config.color.pick(rng))
            .with_decay(0.018)
            .with_secondary(split);
        out.push(finish(star, config));
    }
    out
}

/// Stars ease onto a heart outline, then fall under gravity
pub fn heart(origin: Vec3, config: &ShellConfig, rng: &mut SkyRng) -> Vec<Particle> {
    let count = config.particle_count as usize;
    let scale = config.speed_max * 25.0 / 16.0;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let t = TAU * (i as f32 + 0.5) / count as f32;
        let hx = 16.0 * t.sin().powi(3);
        let hy = -(13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos());
        let target = origin + Vec3::planar(hx * scale, hy * scale);
        let heading = (target - origin).normalized();
        let star = Particle::star(origin, heading * config.speed_min, config.color.pick(rng))
            .with_decay(0.011)
            .with_homing(Homing::new(target, HEART_FORM_STEPS, 0.1));
        out.push(finish(star, config));
    }
    out
}
