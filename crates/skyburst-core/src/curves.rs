//! Interpolation, easing and color blending

use crate::types::Color;

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between two RGBA colors
pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    Color::new(
        lerp_f32(a.r, b.r, t),
        lerp_f32(a.g, b.g, t),
        lerp_f32(a.b, b.b, t),
        lerp_f32(a.a, b.a, t),
    )
}

/// Weighted average of colors; weights need not sum to one
pub fn mix_colors(colors: &[(Color, f32)]) -> Option<Color> {
    let total: f32 = colors.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let mut out = Color::new(0.0, 0.0, 0.0, 0.0);
    for (c, w) in colors {
        let w = w.max(0.0) / total;
        out.r += c.r * w;
        out.g += c.g * w;
        out.b += c.b * w;
        out.a += c.a * w;
    }
    Some(out)
}

/// Push a color toward white by `amount` (0 = unchanged, 1 = white)
pub fn whiten(c: Color, amount: f32) -> Color {
    lerp_color(c, Color::WHITE.with_alpha(c.a), amount.clamp(0.0, 1.0))
}

pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_f32_endpoints() {
        assert!((lerp_f32(0.0, 10.0, 0.0) - 0.0).abs() < 1e-6);
        assert!((lerp_f32(0.0, 10.0, 1.0) - 10.0).abs() < 1e-6);
        assert!((lerp_f32(0.0, 10.0, 0.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn lerp_color_midpoint() {
        let white = Color::new(1.0, 1.0, 1.0, 1.0);
        let black = Color::new(0.0, 0.0, 0.0, 0.0);
        let mid = lerp_color(white, black, 0.5);
        for c in mid.to_array() {
            assert!((c - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn mix_weights_normalize() {
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        let blue = Color::new(0.0, 0.0, 1.0, 1.0);
        let mixed = mix_colors(&[(red, 3.0), (blue, 1.0)]).unwrap();
        assert!((mixed.r - 0.75).abs() < 1e-6);
        assert!((mixed.b - 0.25).abs() < 1e-6);
        assert!(mix_colors(&[(red, 0.0)]).is_none());
    }

    #[test]
    fn easing_is_bounded() {
        for f in [ease_out_quad, ease_in_out_cubic] {
            assert!(f(0.0).abs() < 1e-6);
            assert!((f(1.0) - 1.0).abs() < 1e-6);
            assert!((f(2.0) - 1.0).abs() < 1e-6);
        }
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
    }
}
