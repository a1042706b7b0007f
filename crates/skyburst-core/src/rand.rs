//! Lightweight xorshift64* PRNG - seedable so shows can be replayed exactly

use crate::types::Vec3;
use std::f32::consts::{PI, TAU};

#[derive(Debug, Clone)]
pub struct SkyRng {
    state: u64,
}

impl SkyRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns an integer in [min, max] (inclusive)
    pub fn int_range(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min) as u64 + 1;
        min + (self.next_u64() % span) as u32
    }

    /// Returns an index in [0, len); `len` must be non-zero
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len.max(1) as u64) as usize
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.index(items.len())])
        }
    }

    /// Random angle in [0, 2pi)
    pub fn angle(&mut self) -> f32 {
        self.next_f32() * TAU
    }

    /// Uniform unit vector on the sphere from two independent angles:
    /// azimuth uniform in [0, 2pi), polar angle `acos(2u - 1)`.
    pub fn random_direction(&mut self) -> Vec3 {
        let theta = self.angle();
        let phi = (2.0 * self.next_f32() - 1.0).clamp(-1.0, 1.0).acos();
        let sin_phi = phi.sin();
        Vec3::new(sin_phi * theta.cos(), phi.cos(), sin_phi * theta.sin())
    }

    /// Direction within a cone around `axis` with half-angle `angle_deg`
    pub fn cone_direction(&mut self, axis: Vec3, angle_deg: f32) -> Vec3 {
        if angle_deg <= 0.0 {
            return axis.normalized();
        }
        if angle_deg >= 180.0 {
            return self.random_direction();
        }

        let cos_angle = (angle_deg * PI / 180.0).cos();

        // Uniform cos_theta in [cos_angle, 1], uniform phi in [0, 2pi]
        let cos_theta = self.range(cos_angle, 1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = self.angle();

        let forward = axis.normalized();
        let right = forward.any_perpendicular();
        let up = forward.cross(&right);

        right * (sin_theta * phi.cos()) + up * (sin_theta * phi.sin()) + forward * cos_theta
    }
}
