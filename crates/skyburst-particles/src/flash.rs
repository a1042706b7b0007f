//! Sky lighting: short-lived flashes left behind by bursts

use serde::{Deserialize, Serialize};
use skyburst_core::curves::{ease_out_quad, mix_colors};
use skyburst_core::{Color, Vec3};

/// Ephemeral flash at a burst point. Not pooled; low quality skips them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstFlash {
    pub position: Vec3,
    pub color: Color,
    pub alpha: f32,
    pub radius: f32,
    pub decay: f32,
}

impl BurstFlash {
    pub const DEFAULT_DECAY: f32 = 0.06;

    pub fn new(position: Vec3, color: Color, radius: f32) -> Self {
        Self {
            position,
            color,
            alpha: 1.0,
            radius,
            decay: Self::DEFAULT_DECAY,
        }
    }

    pub fn step(&mut self) {
        self.alpha = (self.alpha - self.decay).max(0.0);
    }

    pub fn expired(&self) -> bool {
        self.alpha <= crate::ALPHA_EPSILON
    }

    /// Brightness contribution; falls off fast right after the burst
    pub fn intensity(&self) -> f32 {
        ease_out_quad(self.alpha)
    }
}

/// Combine live flashes into one sky brightness (0..=1) and a blended color
pub fn sky_glow(flashes: &[BurstFlash]) -> Option<(f32, Color)> {
    let weighted: Vec<(Color, f32)> = flashes
        .iter()
        .filter(|f| !f.expired())
        .map(|f| (f.color, f.intensity()))
        .collect();
    let color = mix_colors(&weighted)?;
    let brightness = weighted.iter().map(|(_, w)| w).sum::<f32>().min(1.0);
    Some((brightness, color.with_alpha(brightness)))
}
