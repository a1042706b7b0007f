//! Named color themes for shells

use crate::rand::SkyRng;
use crate::types::Color;
use serde::{Deserialize, Serialize};

const CLASSIC: [u32; 6] = [0xFF0043, 0x14FC56, 0x1E7FFF, 0xE60AFF, 0xFFBF36, 0xFFFFFF];
const GOLD: [u32; 4] = [0xFFBF36, 0xFFD27A, 0xFF9F1C, 0xFFF1C9];
const PASTEL: [u32; 5] = [0xFFB3C7, 0xB5EAD7, 0xC7CEEA, 0xFFDAC1, 0xE2F0CB];
const NEON: [u32; 5] = [0xFF2A6D, 0x05D9E8, 0xD1F7FF, 0xF706CF, 0x39FF14];
const ICE: [u32; 4] = [0x9AD1FF, 0x5BC0EB, 0xE0FBFC, 0x3A86FF];

/// A named palette shells draw their colors from.
///
/// Deserializes through [`ColorTheme::from_name`], so an unknown name in a
/// config file becomes `Classic` instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ColorTheme {
    #[default]
    Classic,
    Gold,
    Pastel,
    Neon,
    Ice,
}

impl ColorTheme {
    pub const ALL: [ColorTheme; 5] = [
        ColorTheme::Classic,
        ColorTheme::Gold,
        ColorTheme::Pastel,
        ColorTheme::Neon,
        ColorTheme::Ice,
    ];

    /// Look up a theme by name. Unknown names fall back to `Classic`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "classic" => ColorTheme::Classic,
            "gold" => ColorTheme::Gold,
            "pastel" => ColorTheme::Pastel,
            "neon" => ColorTheme::Neon,
            "ice" => ColorTheme::Ice,
            other => {
                tracing::warn!(theme = other, "unknown color theme, using classic");
                ColorTheme::Classic
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorTheme::Classic => "classic",
            ColorTheme::Gold => "gold",
            ColorTheme::Pastel => "pastel",
            ColorTheme::Neon => "neon",
            ColorTheme::Ice => "ice",
        }
    }

    fn hexes(&self) -> &'static [u32] {
        match self {
            ColorTheme::Classic => &CLASSIC,
            ColorTheme::Gold => &GOLD,
            ColorTheme::Pastel => &PASTEL,
            ColorTheme::Neon => &NEON,
            ColorTheme::Ice => &ICE,
        }
    }

    pub fn colors(&self) -> Vec<Color> {
        self.hexes().iter().map(|h| Color::from_hex(*h)).collect()
    }

    pub fn random_color(&self, rng: &mut SkyRng) -> Color {
        let hexes = self.hexes();
        Color::from_hex(hexes[rng.index(hexes.len())])
    }

    /// A second color different from `first` when the palette allows it
    pub fn contrasting(&self, first: Color, rng: &mut SkyRng) -> Color {
        for _ in 0..4 {
            let c = self.random_color(rng);
            if c != first {
                return c;
            }
        }
        Color::WHITE
    }
}

impl From<String> for ColorTheme {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back() {
        assert_eq!(ColorTheme::from_name("GOLD"), ColorTheme::Gold);
        assert_eq!(ColorTheme::from_name("sunset"), ColorTheme::Classic);
    }

    #[test]
    fn random_color_comes_from_palette() {
        let mut rng = SkyRng::new(5);
        for theme in ColorTheme::ALL {
            let palette = theme.colors();
            for _ in 0..20 {
                assert!(palette.contains(&theme.random_color(&mut rng)));
            }
        }
    }

    #[test]
    fn theme_round_trips_through_toml() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            theme: ColorTheme,
        }
        let parsed: Holder = toml::from_str("theme = \"neon\"").unwrap();
        assert_eq!(parsed.theme, ColorTheme::Neon);
        assert_eq!(parsed.theme.name(), "neon");

        let parsed: Holder = toml::from_str("theme = \"sunset\"").unwrap();
        assert_eq!(parsed.theme, ColorTheme::Classic);
        assert_eq!(toml::to_string(&parsed).unwrap().trim(), "theme = \"classic\"");
    }
}
