//! Shell parameters chosen at launch time

use skyburst_core::{Color, ColorTheme, SkyRng};

/// Star coloring for one shell
#[derive(Debug, Clone, PartialEq)]
pub enum ShellColor {
    Single(Color),
    /// Each star picks one of the group at random
    Group(Vec<Color>),
}

impl ShellColor {
    pub fn pick(&self, rng: &mut SkyRng) -> Color {
        match self {
            ShellColor::Single(c) => *c,
            ShellColor::Group(colors) => rng.pick(colors).copied().unwrap_or(Color::WHITE),
        }
    }

    /// Representative color (flash tint, snapshot summary)
    pub fn primary(&self) -> Color {
        match self {
            ShellColor::Single(c) => *c,
            ShellColor::Group(colors) => colors.first().copied().unwrap_or(Color::WHITE),
        }
    }
}

/// Everything a generator needs to build one burst.
///
/// Speeds are in pixels per step. Immutable once a launch picks it; bursts
/// share it through an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    pub shell_type: String,
    pub particle_count: u32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub color: ShellColor,
    /// Degrees: ring band half-width or horsetail cone half-angle
    pub spread: f32,
    pub gravity_multiplier: f32,
    pub pistil: Option<Color>,
    /// Overrides the generator's alpha decay per step
    pub decay: Option<f32>,
    /// Overrides the generator's drag
    pub drag: Option<f32>,
}

impl ShellConfig {
    pub fn new(shell_type: impl Into<String>) -> Self {
        let shell_type = shell_type.into();
        let (count, speed_min, speed_max) = base_profile(&shell_type);
        Self {
            spread: default_spread(&shell_type),
            shell_type,
            particle_count: count,
            speed_min,
            speed_max,
            color: ShellColor::Single(Color::WHITE),
            gravity_multiplier: 1.0,
            pistil: None,
            decay: None,
            drag: None,
        }
    }

    /// Config for an autoplay or click launch: size-scaled, themed colors
    pub fn themed(shell_type: &str, size: f32, theme: ColorTheme, rng: &mut SkyRng) -> Self {
        let mut config = Self::new(shell_type);
        let size = if size.is_finite() { size.clamp(0.25, 4.0) } else { 1.0 };

        config.particle_count = ((config.particle_count as f32 * size).round() as u32).max(1);
        let speed_scale = size.sqrt();
        config.speed_min *= speed_scale;
        config.speed_max *= speed_scale;

        let first = theme.random_color(rng);
        config.color = match shell_type {
            "willow" => ShellColor::Single(Color::GOLD),
            "palm" | "heart" => ShellColor::Single(first),
            _ if rng.chance(0.3) => ShellColor::Group(vec![first, theme.contrasting(first, rng)]),
            _ => ShellColor::Single(first),
        };
        if shell_type == "chrysanthemum" && rng.chance(0.4) {
            config.pistil = Some(theme.contrasting(first, rng));
        }
        config
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_speed(mut self, min: f32, max: f32) -> Self {
        self.speed_min = min;
        self.speed_max = max;
        self
    }

    pub fn with_color(mut self, color: ShellColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_spread(mut self, degrees: f32) -> Self {
        self.spread = degrees;
        self
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = Some(decay);
        self
    }

    pub fn with_pistil(mut self, color: Color) -> Self {
        self.pistil = Some(color);
        self
    }

    /// Correct malformed values to the nearest safe setting, warning for each
    pub fn sanitized(mut self) -> Self {
        let name = self.shell_type.clone();

        if self.particle_count == 0 {
            tracing::warn!(shell = %name, "particle_count must be at least 1, using 1");
            self.particle_count = 1;
        }

        for speed in [&mut self.speed_min, &mut self.speed_max] {
            if !speed.is_finite() || *speed <= 0.0 {
                let fixed = if speed.is_finite() && *speed != 0.0 {
                    speed.abs()
                } else {
                    0.1
                };
                tracing::warn!(shell = %name, speed = *speed, fixed, "non-positive shell speed");
                *speed = fixed;
            }
        }
        if self.speed_min > self.speed_max {
            tracing::warn!(
                shell = %name,
                min = self.speed_min,
                max = self.speed_max,
                "speed range reversed, swapping"
            );
            std::mem::swap(&mut self.speed_min, &mut self.speed_max);
        }

        if let ShellColor::Group(colors) = &self.color {
            if colors.is_empty() {
                tracing::warn!(shell = %name, "empty color group, using white");
                self.color = ShellColor::Single(Color::WHITE);
            }
        }

        if !self.spread.is_finite() || !(0.0..=180.0).contains(&self.spread) {
            let fixed = if self.spread.is_finite() {
                self.spread.clamp(0.0, 180.0)
            } else {
                default_spread(&name)
            };
            tracing::warn!(shell = %name, spread = self.spread, fixed, "spread out of range");
            self.spread = fixed;
        }

        if !self.gravity_multiplier.is_finite() {
            tracing::warn!(shell = %name, "gravity_multiplier is not finite, using 1.0");
            self.gravity_multiplier = 1.0;
        }

        if let Some(decay) = self.decay {
            if !decay.is_finite() || decay <= 0.0 || decay > 1.0 {
                tracing::warn!(shell = %name, decay, "decay override out of (0, 1], ignoring");
                self.decay = None;
            }
        }

        if let Some(drag) = self.drag {
            if !drag.is_finite() || drag <= 0.0 || drag > 1.0 {
                let fixed = if drag.is_finite() { drag.clamp(0.01, 1.0) } else { 1.0 };
                tracing::warn!(shell = %name, drag, fixed, "drag out of (0, 1]");
                self.drag = Some(fixed);
            }
        }

        self
    }
}

/// Base star count and speed range at shell size 1.0
fn base_profile(shell_type: &str) -> (u32, f32, f32) {
    match shell_type {
        "chrysanthemum" => (90, 3.2, 4.2),
        "ring" => (60, 3.0, 4.0),
        "palm" => (20, 3.0, 4.0),
        "willow" => (70, 4.5, 5.5),
        "crackle" => (60, 2.6, 3.6),
        "strobe" => (70, 2.8, 3.8),
        "horsetail" => (40, 3.5, 5.0),
        "crossette" => (24, 3.0, 4.0),
        "heart" => (64, 3.0, 3.0),
        _ => (80, 3.0, 4.0),
    }
}

fn default_spread(shell_type: &str) -> f32 {
    match shell_type {
        "ring" => 4.0,
        "horsetail" => 40.0,
        _ => 0.0,
    }
}
