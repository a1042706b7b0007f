//! Read-only view of the simulation for renderers

use crate::stats::StepStats;
use serde::Serialize;
use skyburst_core::Color;
use skyburst_particles::{KindTag, Particle};

/// A rising shell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellView {
    pub id: u32,
    pub shell_type: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleView {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub radius: f32,
    /// 0 while strobed or flickered out
    pub alpha: f32,
    pub color: [f32; 3],
    pub kind: KindTag,
    pub group: u32,
    /// Recent positions, oldest first; empty unless spark trails are on
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trail: Vec<[f32; 2]>,
}

impl ParticleView {
    pub fn from_particle(p: &Particle) -> Self {
        let trail = p
            .trail()
            .map(|t| t.iter().map(|v| [v.x, v.y]).collect())
            .unwrap_or_default();
        Self {
            x: p.position.x,
            y: p.position.y,
            z: p.position.z,
            radius: p.radius,
            alpha: p.effective_alpha(),
            color: [p.color.r, p.color.g, p.color.b],
            kind: p.kind_tag(),
            group: p.group.0,
            trail,
        }
    }
}

/// Aggregate sky illumination from recent bursts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyLight {
    pub brightness: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub step: u64,
    pub time_ms: f64,
    pub width: f32,
    pub height: f32,
    pub shells: Vec<ShellView>,
    pub particles: Vec<ParticleView>,
    pub sky: Option<SkyLight>,
    pub stats: StepStats,
}

impl Snapshot {
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn group(&self, id: u32) -> impl Iterator<Item = &ParticleView> + '_ {
        self.particles.iter().filter(move |p| p.group == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyburst_core::Vec3;

    #[test]
    fn hidden_particles_report_zero_alpha() {
        let mut p = Particle::star(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Color::GOLD);
        p.visible = false;
        let view = ParticleView::from_particle(&p);
        assert_eq!(view.alpha, 0.0);
        assert_eq!((view.x, view.y, view.z), (1.0, 2.0, 3.0));
        assert!(view.trail.is_empty());
    }

    #[test]
    fn serializes_to_json() {
        let snapshot = Snapshot {
            step: 3,
            time_ms: 50.0,
            width: 800.0,
            height: 600.0,
            shells: vec![ShellView {
                id: 1,
                shell_type: "ring".into(),
                x: 10.0,
                y: 500.0,
            }],
            particles: vec![ParticleView::from_particle(&Particle::spark(
                Vec3::ZERO,
                Vec3::ZERO,
                Color::WHITE,
            ))],
            sky: None,
            stats: StepStats::default(),
        };
        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["shells"][0]["shell_type"], "ring");
        assert_eq!(json["particles"][0]["kind"], "spark");
        assert!(json["particles"][0].get("trail").is_none());
        assert!(json["sky"].is_null());
    }
}
