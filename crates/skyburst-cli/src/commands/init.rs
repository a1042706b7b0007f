//! Show file initialization command

use crate::show::ShowFile;
use anyhow::Result;
use skyburst_audio::SoundConfig;
use skyburst_engine::EngineConfig;
use std::fs;
use std::path::Path;

pub struct InitArgs {
    pub path: String,
    pub width: f32,
    pub height: f32,
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = Path::new(&args.path);

    if path.exists() && !args.force {
        anyhow::bail!("'{}' already exists (use --force to overwrite)", args.path);
    }

    let mut engine = EngineConfig::new(args.width, args.height);
    engine.validate()?;
    let show = ShowFile {
        engine,
        audio: Some(SoundConfig {
            sound_dir: Some("sounds".into()),
            ..Default::default()
        }),
    };

    fs::write(path, show.to_toml_string()?)?;

    println!("Wrote show file '{}'", args.path);
    println!();
    println!("Next steps:");
    println!("  skyburst simulate --show {}", args.path);
    println!("  skyburst play --show {}", args.path);

    Ok(())
}
