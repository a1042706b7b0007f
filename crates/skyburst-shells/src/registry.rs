//! Name-keyed table of shell generators

use crate::builtin;
use crate::config::ShellConfig;
use skyburst_core::{Result, SkyRng, SkyburstError, Vec3};
use skyburst_particles::Particle;
use std::collections::BTreeMap;

/// Builds the particles of one burst around `origin`
pub trait ShellGenerator: Send + Sync {
    fn generate(&self, origin: Vec3, config: &ShellConfig, rng: &mut SkyRng) -> Vec<Particle>;
}

impl<F> ShellGenerator for F
where
    F: Fn(Vec3, &ShellConfig, &mut SkyRng) -> Vec<Particle> + Send + Sync,
{
    fn generate(&self, origin: Vec3, config: &ShellConfig, rng: &mut SkyRng) -> Vec<Particle> {
        self(origin, config, rng)
    }
}

pub struct ShellEntry {
    pub name: String,
    pub display_name: String,
    pub generator: Box<dyn ShellGenerator>,
}

impl std::fmt::Debug for ShellEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellEntry")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

/// Shell types by name. Ordered so seeded random picks are reproducible.
#[derive(Debug, Default)]
pub struct ShellRegistry {
    entries: BTreeMap<String, ShellEntry>,
}

impl ShellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in shell type
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("chrysanthemum", "Chrysanthemum", builtin::chrysanthemum);
        registry.register("ring", "Ring", builtin::ring);
        registry.register("palm", "Palm", builtin::palm);
        registry.register("willow", "Willow", builtin::willow);
        registry.register("crackle", "Crackle", builtin::crackle);
        registry.register("strobe", "Strobe", builtin::strobe);
        registry.register("horsetail", "Horsetail", builtin::horsetail);
        registry.register("crossette", "Crossette", builtin::crossette);
        registry.register("heart", "Heart", builtin::heart);
        registry
    }

    /// Add or replace a shell type
    pub fn register(
        &mut self,
        name: impl Into<String>,
        display_name: impl Into<String>,
        generator: impl ShellGenerator + 'static,
    ) {
        let name = name.into();
        if self.entries.contains_key(&name) {
            tracing::debug!(shell = %name, "replacing registered shell type");
        }
        self.entries.insert(
            name.clone(),
            ShellEntry {
                name,
                display_name: display_name.into(),
                generator: Box::new(generator),
            },
        );
    }

    /// Generate exactly `config.particle_count` particles for shell type `name`.
    ///
    /// `config` is expected to be sanitized already.
    pub fn generate(
        &self,
        name: &str,
        origin: Vec3,
        config: &ShellConfig,
        rng: &mut SkyRng,
    ) -> Result<Vec<Particle>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| SkyburstError::UnknownShell(name.to_string()))?;

        let wanted = config.particle_count as usize;
        let mut particles = entry.generator.generate(origin, config, rng);

        if particles.len() != wanted {
            if particles.is_empty() {
                return Err(SkyburstError::Config(format!(
                    "shell '{name}' produced no particles"
                )));
            }
            tracing::warn!(
                shell = name,
                produced = particles.len(),
                wanted,
                "generator returned the wrong particle count, adjusting"
            );
            if particles.len() > wanted {
                particles.truncate(wanted);
            } else {
                let produced = particles.len();
                for i in 0..(wanted - produced) {
                    let copy = particles[i % produced];
                    particles.push(copy);
                }
            }
        }

        Ok(particles)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ShellEntry> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ShellEntry> + '_ {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Uniform pick among registered types; `None` when the registry is empty
    pub fn random_name(&self, rng: &mut SkyRng) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries
            .keys()
            .nth(rng.index(self.entries.len()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyburst_core::Color;

    const BUILTINS: [&str; 9] = [
        "chrysanthemum",
        "ring",
        "palm",
        "willow",
        "crackle",
        "strobe",
        "horsetail",
        "crossette",
        "heart",
    ];

    #[test]
    fn every_builtin_returns_exact_count() {
        let registry = ShellRegistry::with_builtins();
        let mut rng = SkyRng::new(42);
        for name in BUILTINS {
            for count in [1, 7, 60, 133] {
                let config = ShellConfig::new(name)
                    .with_count(count)
                    .with_pistil(Color::GOLD);
                let particles = registry
                    .generate(name, Vec3::planar(100.0, 100.0), &config, &mut rng)
                    .unwrap();
                assert_eq!(particles.len(), count as usize, "{name} x {count}");
            }
        }
    }

    #[test]
    fn unknown_shell_is_an_error() {
        let registry = ShellRegistry::with_builtins();
        let mut rng = SkyRng::new(1);
        let err = registry
            .generate("peony", Vec3::ZERO, &ShellConfig::new("peony"), &mut rng)
            .unwrap_err();
        assert!(matches!(err, SkyburstError::UnknownShell(ref n) if n == "peony"));
        assert!(err.is_configuration());
    }

    #[test]
    fn closures_register_without_engine_changes() {
        let mut registry = ShellRegistry::new();
        registry.register(
            "dot",
            "Single Dot",
            |origin: Vec3, config: &ShellConfig, _rng: &mut SkyRng| {
                vec![Particle::star(origin, Vec3::ZERO, config.color.primary())]
            },
        );
        assert!(registry.contains("dot"));

        // A generator that under-produces is padded to the requested count
        let mut rng = SkyRng::new(1);
        let config = ShellConfig::new("dot").with_count(5);
        let particles = registry.generate("dot", Vec3::ZERO, &config, &mut rng).unwrap();
        assert_eq!(particles.len(), 5);
        assert_eq!(registry.get("dot").map(|e| e.display_name.as_str()), Some("Single Dot"));
    }

    #[test]
    fn random_name_is_registered_and_seeded() {
        let registry = ShellRegistry::with_builtins();
        let mut a = SkyRng::new(77);
        let mut b = SkyRng::new(77);
        for _ in 0..20 {
            let name = registry.random_name(&mut a).unwrap();
            assert!(registry.contains(name));
            assert_eq!(Some(name), registry.random_name(&mut b));
        }
        assert!(ShellRegistry::new().random_name(&mut a).is_none());
    }

    #[test]
    fn names_are_sorted() {
        let registry = ShellRegistry::with_builtins();
        let names: Vec<&str> = registry.names().collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(registry.len(), BUILTINS.len());
    }
}
