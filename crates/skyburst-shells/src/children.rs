//! Particles spawned by other particles mid-flight.
//!
//! These write into a caller-owned buffer so the engine can reuse one scratch
//! `Vec` every step. Children inherit the parent's burst group.

use skyburst_core::{Color, SkyRng, Vec3};
use skyburst_particles::Particle;
use std::f32::consts::TAU;

/// Crossette split: `pieces` stars keep the parent velocity plus a kick
/// perpendicular to it, spaced evenly around the flight axis.
pub fn split_into(
    parent: &Particle,
    pieces: u8,
    kick: f32,
    rng: &mut SkyRng,
    out: &mut Vec<Particle>,
) {
    let axis = if parent.velocity.length_squared() > 1e-8 {
        parent.velocity.normalized()
    } else {
        rng.random_direction()
    };
    let side = axis.any_perpendicular();
    let up = axis.cross(&side);
    let offset = rng.angle();

    for i in 0..pieces {
        let a = offset + TAU * i as f32 / pieces as f32;
        let perpendicular = side * a.cos() + up * a.sin();
        let mut child = Particle::star(
            parent.position,
            parent.velocity + perpendicular * kick,
            parent.color,
        )
        .with_radius(parent.radius.max(1.2) * 0.8, 0.0)
        .with_decay(parent.decay * 1.5)
        .with_drag(parent.drag)
        .with_gravity_scale(parent.gravity_scale);
        child.group = parent.group;
        out.push(child);
    }
}

/// Nested burst of short sparks from an expiring crackle star
pub fn spark_burst_into(
    parent: &Particle,
    count: u8,
    color: Color,
    rng: &mut SkyRng,
    out: &mut Vec<Particle>,
) {
    for _ in 0..count {
        let velocity = parent.velocity * 0.3 + rng.random_direction() * rng.range(0.8, 2.0);
        let mut spark = Particle::spark(parent.position, velocity, color).with_decay(0.07);
        spark.group = parent.group;
        out.push(spark);
    }
}

/// Sparks shed behind a palm or willow star
pub fn trailing_sparks_into(
    parent: &Particle,
    count: u8,
    color: Color,
    rng: &mut SkyRng,
    out: &mut Vec<Particle>,
) {
    for _ in 0..count {
        let drift = Vec3::new(rng.range(-0.2, 0.2), rng.range(0.0, 0.3), rng.range(-0.2, 0.2));
        let mut spark = Particle::spark(parent.position, parent.velocity * 0.2 + drift, color)
            .with_radius(0.8, 0.01)
            .with_decay(0.06);
        spark.group = parent.group;
        out.push(spark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyburst_particles::{BurstId, KindTag};

    fn parent() -> Particle {
        let mut p = Particle::star(Vec3::planar(50.0, 60.0), Vec3::planar(3.0, 0.0), Color::GOLD);
        p.group = BurstId(4);
        p
    }

    #[test]
    fn split_kicks_perpendicular() {
        let mut rng = SkyRng::new(10);
        let mut out = Vec::new();
        let p = parent();
        split_into(&p, 3, 1.5, &mut rng, &mut out);

        assert_eq!(out.len(), 3);
        for child in &out {
            let kick = child.velocity - p.velocity;
            assert!(kick.dot(&p.velocity).abs() < 1e-4);
            assert!((kick.length() - 1.5).abs() < 1e-4);
            assert_eq!(child.group, BurstId(4));
            assert_eq!(child.alpha, 1.0);
        }
    }

    #[test]
    fn split_from_rest_still_spreads() {
        let mut rng = SkyRng::new(10);
        let mut out = Vec::new();
        let mut p = parent();
        p.velocity = Vec3::ZERO;
        split_into(&p, 2, 1.0, &mut rng, &mut out);
        assert!(out.iter().all(|c| (c.velocity.length() - 1.0).abs() < 1e-4));
    }

    #[test]
    fn sparks_join_parent_group() {
        let mut rng = SkyRng::new(3);
        let mut out = Vec::new();
        spark_burst_into(&parent(), 5, Color::WHITE, &mut rng, &mut out);
        trailing_sparks_into(&parent(), 2, Color::WHITE, &mut rng, &mut out);
        assert_eq!(out.len(), 7);
        assert!(out
            .iter()
            .all(|s| s.group == BurstId(4) && s.kind_tag() == KindTag::Spark));
    }
}
