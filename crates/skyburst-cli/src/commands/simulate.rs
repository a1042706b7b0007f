//! Headless simulation with per-interval statistics

use crate::show::ShowFile;
use anyhow::{Context, Result};
use serde::Serialize;
use skyburst_engine::{Engine, SimEvent, StepStats, STEP_MS};

pub struct SimulateArgs {
    pub show: Option<String>,
    pub seconds: f64,
    pub interval: f64,
    pub seed: Option<u64>,
    pub shell: Option<String>,
    pub format: String,
}

#[derive(Debug, Default, Serialize)]
struct IntervalReport {
    time_s: f64,
    #[serde(flatten)]
    stats: StepStats,
    fireworks: usize,
    launches: usize,
    bursts: usize,
    crackles: usize,
}

impl IntervalReport {
    fn count(&mut self, events: &[SimEvent]) {
        for event in events {
            match event {
                SimEvent::Launch { .. } => self.launches += 1,
                SimEvent::Burst { .. } => self.bursts += 1,
                SimEvent::Crackle { .. } => self.crackles += 1,
            }
        }
    }
}

pub fn run(args: SimulateArgs) -> Result<()> {
    if !(args.seconds > 0.0) || !(args.interval > 0.0) {
        anyhow::bail!("--seconds and --interval must be positive");
    }
    let json = match args.format.as_str() {
        "json" => true,
        "text" => false,
        other => anyhow::bail!("Unknown format: {}", other),
    };

    let mut show = ShowFile::load_or_default(args.show.as_deref())?;
    if let Some(seed) = args.seed {
        show.engine.seed = seed;
    }
    let mut engine = Engine::with_builtin_shells(show.engine).context("Failed to build engine")?;
    if let Some(shell) = &args.shell {
        engine.set_shell_type(shell)?;
    }

    let steps_per_interval = ((args.interval * 1000.0 / STEP_MS).round() as u64).max(1);
    let total_steps = (args.seconds * 1000.0 / STEP_MS).round() as u64;

    if !json {
        println!(
            "{:>7} {:>6} {:>7} {:>7} {:>8} {:>6} {:>5} {:>5}",
            "time", "live", "spawned", "culled", "recycled", "shells", "lift", "burst"
        );
    }

    let mut report = IntervalReport::default();
    let mut peak = 0;
    for step in 1..=total_steps {
        let stats = engine.step();
        report.stats.accumulate(&stats);
        report.count(&engine.drain_events());
        peak = peak.max(stats.live_after);

        if step % steps_per_interval == 0 || step == total_steps {
            report.time_s = engine.now_ms() / 1000.0;
            report.fireworks = engine.active_fireworks();
            if json {
                println!("{}", serde_json::to_string(&report)?);
            } else {
                let s = &report.stats;
                println!(
                    "{:>6.1}s {:>6} {:>7} {:>7} {:>8} {:>6} {:>5} {:>5}",
                    report.time_s,
                    s.live_after,
                    s.spawned,
                    s.culled,
                    s.recycled,
                    report.fireworks,
                    report.launches,
                    report.bursts
                );
            }
            report = IntervalReport::default();
        }
    }

    if !json {
        println!(
            "\n{} steps, peak {} particles (capacity {})",
            total_steps,
            peak,
            engine.pool().capacity()
        );
    }

    Ok(())
}
