//! Run a fixed number of steps and dump the snapshot as JSON

use crate::show::ShowFile;
use anyhow::{Context, Result};
use skyburst_engine::Engine;
use std::fs;

pub struct SnapshotArgs {
    pub show: Option<String>,
    pub steps: u64,
    pub seed: Option<u64>,
    /// Launch a shell at this x before stepping
    pub launch_x: Option<f32>,
    pub output: Option<String>,
    pub compact: bool,
}

pub fn run(args: SnapshotArgs) -> Result<()> {
    let mut show = ShowFile::load_or_default(args.show.as_deref())?;
    if let Some(seed) = args.seed {
        show.engine.seed = seed;
    }
    let mut engine = Engine::with_builtin_shells(show.engine).context("Failed to build engine")?;
    if let Some(x) = args.launch_x {
        engine.launch_at(x);
    }

    for _ in 0..args.steps {
        engine.step();
    }

    let snapshot = engine.snapshot();
    let json = if args.compact {
        serde_json::to_string(&snapshot)?
    } else {
        serde_json::to_string_pretty(&snapshot)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write '{}'", path))?;
            eprintln!(
                "Snapshot at step {} ({} particles) written to {}",
                snapshot.step,
                snapshot.particle_count(),
                path
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
