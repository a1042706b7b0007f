//! The firework simulation: launches, bursts, decay and autoplay

use crate::clock::{FrameClock, STEP_MS};
use crate::config::EngineConfig;
use crate::events::{EventBus, SimEvent};
use crate::firework::{Firework, FireworkState, LaunchConfig, ShellPoint, MAX_BURST_STEPS};
use crate::snapshot::{ParticleView, ShellView, SkyLight, Snapshot};
use crate::stats::StepStats;
use skyburst_core::curves::whiten;
use skyburst_core::{Result, SkyRng, SkyburstError, Vec3};
use skyburst_particles::{
    sky_glow, BurstFlash, BurstId, Emission, Particle, ParticleInstance, ParticlePool,
};
use skyburst_shells::{children, ShellConfig, ShellRegistry};
use std::collections::HashMap;
use std::sync::Arc;

/// How launches without an explicit shell pick their type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellChoice {
    Random,
    Named(String),
}

/// Owns the particle pool and every firework in flight.
///
/// Single-threaded: the host calls [`tick`](Engine::tick) once per frame and
/// reads [`snapshot`](Engine::snapshot) or [`pack_instances`](Engine::pack_instances).
pub struct Engine {
    config: EngineConfig,
    registry: Arc<ShellRegistry>,
    pool: ParticlePool,
    fireworks: Vec<Firework>,
    /// Live particle count per burst group
    live_by_burst: HashMap<BurstId, usize>,
    flashes: Vec<BurstFlash>,
    events: EventBus,
    clock: FrameClock,
    rng: SkyRng,
    step_index: u64,
    next_id: u32,
    next_autoplay_ms: Option<f64>,
    shell_choice: ShellChoice,
    sky_lighting: bool,
    spark_trails: bool,
    /// Reused every step so warm steps don't allocate
    scratch: Vec<Particle>,
    emissions: Vec<(Particle, Emission)>,
    crackles: Vec<(BurstId, Vec3, usize)>,
    last_stats: StepStats,
}

impl Engine {
    pub fn new(mut config: EngineConfig, registry: Arc<ShellRegistry>) -> Result<Self> {
        config.validate()?;

        let shell_choice = if config.shell_type.eq_ignore_ascii_case("random") {
            ShellChoice::Random
        } else if registry.contains(&config.shell_type) {
            ShellChoice::Named(config.shell_type.clone())
        } else {
            tracing::warn!(shell = %config.shell_type, "unknown shell type, using random");
            config.shell_type = "random".to_string();
            ShellChoice::Random
        };

        let capacity = config.pool_capacity();
        tracing::info!(
            width = config.width,
            height = config.height,
            quality = config.quality.name(),
            capacity,
            shells = registry.len(),
            "firework engine ready"
        );

        Ok(Self {
            pool: ParticlePool::new(capacity),
            fireworks: Vec::new(),
            live_by_burst: HashMap::new(),
            flashes: Vec::new(),
            events: EventBus::new(),
            clock: FrameClock::new(),
            rng: SkyRng::new(config.seed),
            step_index: 0,
            next_id: 1,
            next_autoplay_ms: config.autoplay.then_some(0.0),
            shell_choice,
            sky_lighting: config.sky_lighting_enabled(),
            spark_trails: config.spark_trails(),
            scratch: Vec::new(),
            emissions: Vec::new(),
            crackles: Vec::new(),
            last_stats: StepStats::default(),
            config,
            registry,
        })
    }

    pub fn with_builtin_shells(config: EngineConfig) -> Result<Self> {
        Self::new(config, Arc::new(ShellRegistry::with_builtins()))
    }

    // ── Per frame ──

    /// Feed one host frame; runs as many whole steps as have accumulated
    pub fn tick(&mut self, delta_ms: f64) -> usize {
        self.clock.advance(delta_ms);
        let mut steps = 0;
        while self.clock.should_step() {
            self.clock.consume_step();
            self.step();
            steps += 1;
        }
        steps
    }

    /// Run exactly one simulation step
    pub fn step(&mut self) -> StepStats {
        self.step_index += 1;
        let now = self.now_ms();
        let mut stats = StepStats {
            live_before: self.pool.alive_count(),
            ..StepStats::default()
        };

        for flash in &mut self.flashes {
            flash.step();
        }
        self.flashes.retain(|f| !f.expired());

        self.ignite_scheduled(now);
        self.advance_ascents(&mut stats);
        self.advance_particles(&mut stats);
        self.cull(&mut stats);
        self.run_autoplay(now);

        stats.live_after = self.pool.alive_count();
        debug_assert!(stats.is_balanced(), "unbalanced step: {stats:?}");
        self.last_stats = stats;
        stats
    }

    pub fn snapshot(&self) -> Snapshot {
        let shells = self
            .fireworks
            .iter()
            .filter_map(|fw| match &fw.state {
                FireworkState::Ascending(shell) => Some(ShellView {
                    id: fw.id.0,
                    shell_type: fw.launch.shell.shell_type.clone(),
                    x: shell.position.x,
                    y: shell.position.y,
                }),
                _ => None,
            })
            .collect();

        let particles = self
            .pool
            .iter_alive()
            .map(|(_, p)| ParticleView::from_particle(p))
            .collect();

        let sky = if self.sky_lighting {
            sky_glow(&self.flashes).map(|(brightness, color)| SkyLight { brightness, color })
        } else {
            None
        };

        Snapshot {
            step: self.step_index,
            time_ms: self.now_ms(),
            width: self.config.width,
            height: self.config.height,
            shells,
            particles,
            sky,
            stats: self.last_stats,
        }
    }

    /// Refill `out` with GPU instances: rising shells first, then particles
    pub fn pack_instances(&self, out: &mut Vec<ParticleInstance>) {
        out.clear();
        for fw in &self.fireworks {
            if let FireworkState::Ascending(shell) = &fw.state {
                let color = whiten(fw.launch.shell.color.primary(), 0.5);
                out.push(ParticleInstance::shell_point(shell.position, 2.0, color));
            }
        }
        self.pool
            .for_each_alive(|_, p| out.push(ParticleInstance::from_particle(p)));
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    // ── Interaction ──

    /// Fire a shell from canvas x right now. Pushes the pending autoplay
    /// launch back by one interval.
    pub fn launch_at(&mut self, x: f32) -> BurstId {
        let x = if x.is_finite() {
            x.clamp(0.0, self.config.width)
        } else {
            self.config.width / 2.0
        };
        let launch = self.make_launch(x);
        let id = self.ignite(launch);

        if self.next_autoplay_ms.is_some() {
            let delay = self.autoplay_interval();
            if let Some(due) = &mut self.next_autoplay_ms {
                *due += delay;
            }
        }
        id
    }

    /// Fire a fully specified shell right now
    pub fn launch(&mut self, launch: LaunchConfig) -> BurstId {
        self.ignite(launch)
    }

    /// Fire a shell after `delay_ms` of simulation time
    pub fn schedule(&mut self, launch: LaunchConfig, delay_ms: f64) -> BurstId {
        let launch = self.clean_launch(launch);
        let id = self.allocate_id();
        let at_ms = self.now_ms() + delay_ms.max(0.0);
        self.fireworks.push(Firework::scheduled(id, launch, at_ms));
        id
    }

    pub fn set_autoplay(&mut self, enabled: bool) {
        if enabled == self.config.autoplay {
            return;
        }
        self.config.autoplay = enabled;
        self.next_autoplay_ms = enabled.then(|| self.now_ms());
        tracing::info!(enabled, "autoplay");
    }

    pub fn set_density(&mut self, density: f32) {
        let fixed = if density.is_finite() {
            density.clamp(0.1, 5.0)
        } else {
            1.0
        };
        if fixed != density {
            tracing::warn!(density, fixed, "density out of range");
        }
        self.config.density = fixed;
    }

    /// Select the shell type for autoplay and click launches.
    ///
    /// Unknown names fall back to random selection and return the error.
    pub fn set_shell_type(&mut self, name: &str) -> Result<()> {
        if name.eq_ignore_ascii_case("random") {
            self.shell_choice = ShellChoice::Random;
            self.config.shell_type = "random".to_string();
            return Ok(());
        }
        if self.registry.contains(name) {
            self.shell_choice = ShellChoice::Named(name.to_string());
            self.config.shell_type = name.to_string();
            return Ok(());
        }
        tracing::warn!(shell = name, "unknown shell type, using random");
        self.shell_choice = ShellChoice::Random;
        self.config.shell_type = "random".to_string();
        Err(SkyburstError::UnknownShell(name.to_string()))
    }

    /// Drop every particle, firework, flash and pending event; stop autoplay
    pub fn dispose(&mut self) {
        let released = self.pool.alive_count();
        self.pool.clear();
        self.fireworks.clear();
        self.live_by_burst.clear();
        self.flashes.clear();
        self.events.clear();
        self.next_autoplay_ms = None;
        self.config.autoplay = false;
        self.clock.reset();
        tracing::info!(released, "engine disposed");
    }

    // ── Accessors ──

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ShellRegistry> {
        &self.registry
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    /// Fireworks rising or burning (not scheduled)
    pub fn active_fireworks(&self) -> usize {
        self.fireworks.iter().filter(|f| f.is_active()).count()
    }

    pub fn shell_choice(&self) -> &ShellChoice {
        &self.shell_choice
    }

    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    /// Simulation time of the current step
    pub fn now_ms(&self) -> f64 {
        self.step_index as f64 * STEP_MS
    }

    pub fn next_autoplay_ms(&self) -> Option<f64> {
        self.next_autoplay_ms
    }

    pub fn last_stats(&self) -> StepStats {
        self.last_stats
    }

    pub fn interpolation_alpha(&self) -> f64 {
        self.clock.interpolation_alpha()
    }

    // ── Step phases ──

    fn ignite_scheduled(&mut self, now: f64) {
        let ground = self.config.height;
        let gravity = self.config.gravity;
        for fw in &mut self.fireworks {
            if let FireworkState::Scheduled { at_ms } = fw.state {
                if at_ms <= now {
                    fw.state =
                        FireworkState::Ascending(ShellPoint::ignite(&fw.launch, ground, gravity));
                    self.events.push(SimEvent::Launch {
                        x: fw.launch.origin_x,
                    });
                }
            }
        }
    }

    fn advance_ascents(&mut self, stats: &mut StepStats) {
        let gravity = self.config.gravity;
        for i in 0..self.fireworks.len() {
            let burst_at = match &mut self.fireworks[i].state {
                FireworkState::Ascending(shell) => shell.rise(gravity).then_some(shell.position),
                _ => None,
            };
            if let Some(at) = burst_at {
                self.fireworks[i].state = FireworkState::Exploding { at };
                self.explode(i, stats);
            }
        }
    }

    fn explode(&mut self, index: usize, stats: &mut StepStats) {
        let FireworkState::Exploding { at } = self.fireworks[index].state else {
            return;
        };
        let id = self.fireworks[index].id;
        let shell = Arc::clone(&self.fireworks[index].launch.shell);

        let generated = match self
            .registry
            .generate(&shell.shell_type, at, &shell, &mut self.rng)
        {
            Ok(particles) => Some((shell.shell_type.clone(), particles)),
            Err(err) => {
                let fallback = self.registry.random_name(&mut self.rng).map(str::to_string);
                tracing::warn!(
                    shell = %shell.shell_type,
                    error = %err,
                    fallback = ?fallback,
                    "cannot generate shell, using a random type"
                );
                fallback.and_then(|name| {
                    self.registry
                        .generate(&name, at, &shell, &mut self.rng)
                        .ok()
                        .map(|particles| (name, particles))
                })
            }
        };

        let Some((name, particles)) = generated else {
            self.fireworks[index].state = FireworkState::Retired;
            return;
        };

        let count = particles.len();
        self.live_by_burst.insert(id, 0);
        for mut particle in particles {
            particle.group = id;
            particle.born = self.step_index;
            self.spawn(particle, stats);
        }

        if self.sky_lighting {
            let radius = 60.0 * self.config.shell_size;
            self.flashes
                .push(BurstFlash::new(at, shell.color.primary(), radius));
        }

        tracing::debug!(id = id.0, shell = %name, count, "burst");
        self.events.push(SimEvent::Burst {
            x: at.x,
            y: at.y,
            shell: name,
            count,
        });
        self.fireworks[index].state = FireworkState::Decaying { steps: 0 };
    }

    fn advance_particles(&mut self, stats: &mut StepStats) {
        let gravity = self.config.gravity;
        let trails = self.spark_trails;
        let step = self.step_index;

        let Self {
            pool,
            rng,
            emissions,
            ..
        } = self;
        emissions.clear();
        pool.for_each_alive_mut(|_, p| {
            let fresh = p.born == step;
            if let Some(emission) = p.advance(gravity, trails, fresh, rng) {
                emissions.push((*p, emission));
            }
        });

        self.crackles.clear();
        for e in 0..self.emissions.len() {
            let (parent, emission) = self.emissions[e];
            self.scratch.clear();
            match emission {
                Emission::Split { pieces, kick } => {
                    children::split_into(&parent, pieces, kick, &mut self.rng, &mut self.scratch)
                }
                Emission::Burst { count, color } => {
                    children::spark_burst_into(
                        &parent,
                        count,
                        color,
                        &mut self.rng,
                        &mut self.scratch,
                    );
                    self.note_crackle(parent.group, parent.position, count as usize);
                }
                Emission::Sparks { count, color } => children::trailing_sparks_into(
                    &parent,
                    count,
                    color,
                    &mut self.rng,
                    &mut self.scratch,
                ),
            }

            // Children are integrated this step but not decayed
            for c in 0..self.scratch.len() {
                let mut child = self.scratch[c];
                child.born = step;
                child.advance(gravity, trails, true, &mut self.rng);
                self.spawn(child, stats);
            }
        }

        for &(_, at, count) in &self.crackles {
            self.events.push(SimEvent::Crackle {
                x: at.x,
                y: at.y,
                count,
            });
        }
    }

    fn cull(&mut self, stats: &mut StepStats) {
        let live = &mut self.live_by_burst;
        stats.culled += self.pool.cull_expired(|p| {
            if let Some(n) = live.get_mut(&p.group) {
                *n = n.saturating_sub(1);
            }
        });

        for fw in &mut self.fireworks {
            let FireworkState::Decaying { steps } = &mut fw.state else {
                continue;
            };
            *steps += 1;
            let timed_out = *steps >= MAX_BURST_STEPS;
            let live = self.live_by_burst.get(&fw.id).copied().unwrap_or(0);
            if live == 0 || timed_out {
                if live > 0 {
                    let released = self.pool.release_group(fw.id);
                    stats.culled += released;
                    tracing::debug!(id = fw.id.0, released, "burst timed out");
                }
                self.live_by_burst.remove(&fw.id);
                fw.state = FireworkState::Retired;
            }
        }
        self.fireworks.retain(|f| !f.is_retired());
    }

    fn run_autoplay(&mut self, now: f64) {
        let Some(due) = self.next_autoplay_ms else {
            return;
        };
        if now < due {
            return;
        }
        let limit = (self.config.density * 6.0).ceil() as usize;
        if self.active_fireworks() >= limit {
            // Stay pending until a slot frees up
            return;
        }

        let width = self.config.width;
        let x = self.rng.range(width * 0.1, width * 0.9);
        let launch = self.make_launch(x);
        self.ignite(launch);
        self.next_autoplay_ms = Some(now + self.autoplay_interval());
    }

    // ── Helpers ──

    fn spawn(&mut self, particle: Particle, stats: &mut StepStats) {
        let group = particle.group;
        let (_, evicted) = self.pool.spawn(particle);
        stats.spawned += 1;
        if let Some(victim) = evicted {
            stats.recycled += 1;
            if let Some(n) = self.live_by_burst.get_mut(&victim) {
                *n = n.saturating_sub(1);
            }
        }
        *self.live_by_burst.entry(group).or_insert(0) += 1;
    }

    fn note_crackle(&mut self, group: BurstId, at: Vec3, count: usize) {
        match self.crackles.iter_mut().find(|(g, _, _)| *g == group) {
            Some(entry) => entry.2 += count,
            None => self.crackles.push((group, at, count)),
        }
    }

    fn ignite(&mut self, launch: LaunchConfig) -> BurstId {
        let launch = self.clean_launch(launch);
        let id = self.allocate_id();
        let shell = ShellPoint::ignite(&launch, self.config.height, self.config.gravity);
        tracing::debug!(
            id = id.0,
            shell = %launch.shell.shell_type,
            x = launch.origin_x,
            "launch"
        );
        self.events.push(SimEvent::Launch {
            x: launch.origin_x,
        });
        self.fireworks.push(Firework {
            id,
            launch,
            state: FireworkState::Ascending(shell),
        });
        id
    }

    fn make_launch(&mut self, x: f32) -> LaunchConfig {
        let name = match &self.shell_choice {
            ShellChoice::Named(name) => name.clone(),
            ShellChoice::Random => self
                .registry
                .random_name(&mut self.rng)
                .unwrap_or("chrysanthemum")
                .to_string(),
        };
        let shell = ShellConfig::themed(
            &name,
            self.config.shell_size,
            self.config.theme,
            &mut self.rng,
        )
        .sanitized();
        let [low, high] = self.config.apex_range;
        let apex_y = self.config.height * self.rng.range(low, high);
        LaunchConfig {
            origin_x: x,
            apex_y,
            ascent_speed: self.rng.range(0.9, 1.05),
            shell: Arc::new(shell),
        }
    }

    fn clean_launch(&self, mut launch: LaunchConfig) -> LaunchConfig {
        let (width, height) = (self.config.width, self.config.height);
        if !launch.origin_x.is_finite() {
            tracing::warn!("launch x is not finite, centering");
            launch.origin_x = width / 2.0;
        }
        launch.origin_x = launch.origin_x.clamp(0.0, width);
        if !launch.apex_y.is_finite() {
            tracing::warn!("apex is not finite, using mid-canvas");
            launch.apex_y = height / 2.0;
        }
        launch.apex_y = launch.apex_y.clamp(0.0, height);
        if !launch.ascent_speed.is_finite() || launch.ascent_speed <= 0.0 {
            tracing::warn!(speed = launch.ascent_speed, "invalid ascent speed, using 1.0");
            launch.ascent_speed = 1.0;
        }

        let clean = launch.shell.as_ref().clone().sanitized();
        if clean != *launch.shell {
            launch.shell = Arc::new(clean);
        }
        launch
    }

    fn allocate_id(&mut self) -> BurstId {
        let id = BurstId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    fn autoplay_interval(&mut self) -> f64 {
        let [min, max] = self.config.launch_interval_ms;
        (self.rng.range(min, max) / self.config.density) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyburst_particles::KindTag;

    fn quiet_config() -> EngineConfig {
        let mut config = EngineConfig::new(800.0, 600.0);
        config.autoplay = false;
        config.gravity = 0.0;
        config.seed = 7;
        config
    }

    fn step_until_burst(engine: &mut Engine) -> SimEvent {
        for _ in 0..1_000 {
            engine.step();
            if let Some(burst) = engine
                .drain_events()
                .into_iter()
                .find(|e| matches!(e, SimEvent::Burst { .. }))
            {
                return burst;
            }
        }
        panic!("no burst within 1000 steps");
    }

    #[test]
    fn ring_burst_scenario() {
        let mut config = quiet_config();
        config.shell_type = "ring".into();
        let mut engine = Engine::with_builtin_shells(config).unwrap();

        let id = engine.launch_at(400.0);
        match step_until_burst(&mut engine) {
            SimEvent::Burst { shell, count, x, .. } => {
                assert_eq!(shell, "ring");
                assert_eq!(count, 60);
                assert!((x - 400.0).abs() < 1e-3);
            }
            other => panic!("Expected burst, got {other:?}"),
        }

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.particle_count(), 60);
        assert!(snapshot.shells.is_empty());
        for p in &snapshot.particles {
            assert_eq!(p.alpha, 1.0);
            assert_eq!(p.group, id.0);
            assert_eq!(p.kind, KindTag::Star);
        }

        // Alpha falls by the star decay each step; gone after ceil(1 / decay)
        let decay = engine.pool().iter_alive().next().map(|(_, p)| p.decay).unwrap();
        let lifetime = (1.0 / decay).ceil() as u32;
        for k in 1..lifetime {
            engine.step();
            let expected = 1.0 - k as f32 * decay;
            let snapshot = engine.snapshot();
            assert_eq!(snapshot.particle_count(), 60, "step {k}");
            for p in &snapshot.particles {
                assert!((p.alpha - expected).abs() < 1e-4);
            }
        }
        let stats = engine.step();
        assert_eq!(stats.culled, 60);
        assert_eq!(engine.pool().alive_count(), 0);
        assert!(engine.fireworks().is_empty());
    }

    #[test]
    fn ring_burst_tilts_stay_within_spread() {
        let burst_velocities = |spread: f32| {
            let mut engine = Engine::with_builtin_shells(quiet_config()).unwrap();
            engine.launch(LaunchConfig {
                origin_x: 400.0,
                apex_y: 200.0,
                ascent_speed: 1.0,
                shell: Arc::new(ShellConfig::new("ring").with_count(60).with_spread(spread)),
            });
            step_until_burst(&mut engine);
            engine
                .pool()
                .iter_alive()
                .map(|(_, p)| p.velocity)
                .collect::<Vec<Vec3>>()
        };

        // Same seed, same plane: the flat ring pins the plane down exactly
        let flat = burst_velocities(0.0);
        let normal = flat[0].cross(&flat[15]).normalized();
        let tilted = burst_velocities(4.0);
        assert_eq!(tilted.len(), 60);
        for v in &tilted {
            let tilt = (v.dot(&normal).abs() / v.length()).min(1.0).asin().to_degrees();
            assert!(tilt <= 4.0 + 1e-2, "tilt {tilt}");
        }
    }

    #[test]
    fn long_lived_burst_retires_at_step_limit() {
        let mut engine = Engine::with_builtin_shells(quiet_config()).unwrap();
        let id = engine.launch(LaunchConfig {
            origin_x: 400.0,
            apex_y: 200.0,
            ascent_speed: 1.0,
            shell: Arc::new(ShellConfig::new("ring").with_count(10).with_decay(0.0002)),
        });
        step_until_burst(&mut engine);
        assert_eq!(engine.pool().alive_count(), 10);

        let mut steps = 0;
        while !engine.fireworks().is_empty() {
            let stats = engine.step();
            steps += 1;
            assert!(stats.is_balanced(), "step {steps}: {stats:?}");
            assert!(steps <= MAX_BURST_STEPS, "burst never retired");
            if engine.fireworks().is_empty() {
                // Survivors are released together in the retiring step
                assert_eq!(stats.culled, 10);
            } else {
                assert_eq!(stats.culled, 0);
            }
        }
        assert!(steps >= MAX_BURST_STEPS - 1);
        assert_eq!(engine.pool().alive_count(), 0);
        assert_eq!(engine.snapshot().group(id.0).count(), 0);
    }

    #[test]
    fn saturated_pool_recycles_oldest_bursts() {
        let mut config = quiet_config();
        config.max_particles = Some(200);
        let mut engine = Engine::with_builtin_shells(config).unwrap();

        let shell = Arc::new(ShellConfig::new("ring").with_count(60));
        let ids: Vec<BurstId> = (0..10)
            .map(|i| {
                engine.launch(LaunchConfig {
                    origin_x: 50.0 + i as f32 * 70.0,
                    apex_y: 200.0,
                    ascent_speed: 1.0,
                    shell: Arc::clone(&shell),
                })
            })
            .collect();

        let stats = loop {
            let stats = engine.step();
            if stats.spawned > 0 {
                break stats;
            }
        };
        assert_eq!(stats.spawned, 600);
        assert_eq!(stats.recycled, 400);
        assert_eq!(stats.live_after, 200);
        assert!(stats.is_balanced());

        let snapshot = engine.snapshot();
        for id in &ids[..6] {
            assert_eq!(snapshot.group(id.0).count(), 0);
        }
        assert_eq!(snapshot.group(ids[6].0).count(), 20);
        for id in &ids[7..] {
            assert_eq!(snapshot.group(id.0).count(), 60);
        }
        // Fully recycled bursts retire in the same step
        assert_eq!(engine.fireworks().len(), 4);
    }

    #[test]
    fn every_step_conserves_particles() {
        let mut config = EngineConfig::new(800.0, 600.0);
        config.density = 5.0;
        config.max_particles = Some(300);
        config.quality = crate::config::Quality::High;
        config.seed = 11;
        let mut engine = Engine::with_builtin_shells(config).unwrap();

        let mut recycled = 0;
        for _ in 0..3_000 {
            let stats = engine.step();
            assert!(stats.is_balanced(), "{stats:?}");
            assert!(stats.live_after <= 300);
            recycled += stats.recycled;
        }
        assert!(recycled > 0, "show never saturated the pool");
    }

    #[test]
    fn same_seed_same_show() {
        let run = || {
            let mut config = EngineConfig::new(640.0, 480.0);
            config.seed = 42;
            config.density = 2.0;
            let mut engine = Engine::with_builtin_shells(config).unwrap();
            let mut events = Vec::new();
            for frame in 0..600 {
                if frame == 100 {
                    engine.launch_at(320.0);
                }
                engine.tick(16.7);
                events.extend(engine.drain_events());
            }
            (engine.snapshot(), events)
        };
        let (a, events_a) = run();
        let (b, events_b) = run();
        assert!(a.particle_count() > 0);
        assert_eq!(a, b);
        assert_eq!(events_a, events_b);
    }

    #[test]
    fn autoplay_off_lets_show_wind_down() {
        let mut config = EngineConfig::new(800.0, 600.0);
        config.density = 2.0;
        let mut engine = Engine::with_builtin_shells(config).unwrap();

        for _ in 0..600 {
            engine.step();
        }
        let launched = engine
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SimEvent::Launch { .. }))
            .count();
        assert!(launched > 0);

        engine.set_autoplay(false);
        assert!(engine.next_autoplay_ms().is_none());
        let in_flight = engine.fireworks().len();
        assert!(in_flight > 0);

        let mut steps = 0;
        while !engine.fireworks().is_empty() {
            engine.step();
            steps += 1;
            assert!(steps < 2_000, "fireworks never retired");
        }
        assert!(!engine
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimEvent::Launch { .. })));
        assert_eq!(engine.pool().alive_count(), 0);
    }

    #[test]
    fn launch_at_pushes_autoplay_back() {
        let mut config = EngineConfig::new(800.0, 600.0);
        config.seed = 3;
        let mut engine = Engine::with_builtin_shells(config).unwrap();

        engine.step();
        assert_eq!(engine.fireworks().len(), 1);
        let due = engine.next_autoplay_ms().unwrap();

        engine.launch_at(100.0);
        assert_eq!(engine.fireworks().len(), 2);
        assert!(engine.next_autoplay_ms().unwrap() > due);
    }

    #[test]
    fn unknown_shell_falls_back_to_random() {
        let mut engine = Engine::with_builtin_shells(quiet_config()).unwrap();
        engine.launch(LaunchConfig {
            origin_x: 300.0,
            apex_y: 200.0,
            ascent_speed: 1.0,
            shell: Arc::new(ShellConfig::new("peony")),
        });
        match step_until_burst(&mut engine) {
            SimEvent::Burst { shell, count, .. } => {
                assert_ne!(shell, "peony");
                assert!(engine.registry().contains(&shell));
                assert_eq!(count, 80);
            }
            other => panic!("Expected burst, got {other:?}"),
        }
    }

    #[test]
    fn set_shell_type_validates() {
        let mut engine = Engine::with_builtin_shells(quiet_config()).unwrap();
        engine.set_shell_type("willow").unwrap();
        assert_eq!(engine.shell_choice(), &ShellChoice::Named("willow".into()));

        let err = engine.set_shell_type("nope").unwrap_err();
        assert!(matches!(err, SkyburstError::UnknownShell(_)));
        assert_eq!(engine.shell_choice(), &ShellChoice::Random);
        assert_eq!(engine.config().shell_type, "random");

        engine.set_shell_type("RANDOM").unwrap();
        assert_eq!(engine.shell_choice(), &ShellChoice::Random);
    }

    #[test]
    fn unknown_configured_shell_is_corrected() {
        let mut config = quiet_config();
        config.shell_type = "peony".into();
        let engine = Engine::with_builtin_shells(config).unwrap();
        assert_eq!(engine.shell_choice(), &ShellChoice::Random);
    }

    #[test]
    fn bad_canvas_is_rejected() {
        let config = EngineConfig::new(-1.0, 600.0);
        assert!(Engine::with_builtin_shells(config).is_err());
    }

    #[test]
    fn scheduled_launch_waits() {
        let mut engine = Engine::with_builtin_shells(quiet_config()).unwrap();
        let launch = LaunchConfig {
            origin_x: 200.0,
            apex_y: 200.0,
            ascent_speed: 1.0,
            shell: Arc::new(ShellConfig::new("ring")),
        };
        engine.schedule(launch, 100.0);
        assert_eq!(engine.active_fireworks(), 0);

        let mut launched_at = None;
        for _ in 0..20 {
            engine.step();
            if engine
                .drain_events()
                .iter()
                .any(|e| matches!(e, SimEvent::Launch { .. }))
            {
                launched_at = Some(engine.now_ms());
                break;
            }
        }
        let t = launched_at.expect("scheduled shell never launched");
        assert!(t >= 100.0 && t < 100.0 + STEP_MS + 1e-9);
        assert_eq!(engine.active_fireworks(), 1);
    }

    #[test]
    fn tick_runs_whole_steps() {
        let mut engine = Engine::with_builtin_shells(quiet_config()).unwrap();
        assert_eq!(engine.tick(STEP_MS * 3.0 + 0.1), 3);
        assert_eq!(engine.step_index(), 3);
        assert_eq!(engine.tick(1.0), 0);
    }

    #[test]
    fn pack_instances_covers_shells_and_particles() {
        let mut engine = Engine::with_builtin_shells(quiet_config()).unwrap();
        engine.launch_at(100.0);
        engine.step();
        let mut instances = Vec::new();
        engine.pack_instances(&mut instances);
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].rotation_kind[1], 2.0);

        step_until_burst(&mut engine);
        engine.pack_instances(&mut instances);
        assert_eq!(instances.len(), engine.pool().alive_count());
    }

    #[test]
    fn sky_lighting_follows_quality() {
        for (quality, lit) in [
            (crate::config::Quality::Low, false),
            (crate::config::Quality::Normal, true),
        ] {
            let mut config = quiet_config();
            config.quality = quality;
            let mut engine = Engine::with_builtin_shells(config).unwrap();
            engine.launch_at(400.0);
            step_until_burst(&mut engine);
            assert_eq!(engine.snapshot().sky.is_some(), lit);
        }
    }

    #[test]
    fn dispose_clears_everything() {
        let mut engine = Engine::with_builtin_shells(EngineConfig::new(800.0, 600.0)).unwrap();
        for _ in 0..300 {
            engine.step();
        }
        engine.dispose();
        assert_eq!(engine.pool().alive_count(), 0);
        assert!(engine.fireworks().is_empty());
        assert!(engine.drain_events().is_empty());

        for _ in 0..300 {
            engine.step();
        }
        assert!(engine.fireworks().is_empty());
        assert!(engine.drain_events().is_empty());
    }
}
