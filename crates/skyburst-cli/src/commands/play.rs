//! Real-time show with sound
//!
//! Drives the engine from wall-clock frame deltas, feeds its events to the
//! sound manager and prints a status line once a second.

use crate::show::ShowFile;
use anyhow::{Context, Result};
use skyburst_audio::{SoundConfig, SoundManager};
use skyburst_engine::Engine;
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16);

pub struct PlayArgs {
    pub show: Option<String>,
    /// Run forever when absent
    pub seconds: Option<f64>,
    pub mute: bool,
    pub sounds: Option<String>,
}

pub fn run(args: PlayArgs) -> Result<()> {
    let show = ShowFile::load_or_default(args.show.as_deref())?;
    let mut engine = Engine::with_builtin_shells(show.engine).context("Failed to build engine")?;

    let mut audio_config = show.audio.unwrap_or_else(SoundConfig::default);
    if let Some(dir) = args.sounds {
        audio_config.sound_dir = Some(dir.into());
    }
    audio_config.muted |= args.mute;
    let mut sound = SoundManager::new(audio_config);

    if !sound.is_available() {
        eprintln!("No audio device, playing silent");
    } else if sound.bank().is_empty() {
        eprintln!("No sounds loaded (set [audio] sound_dir or pass --sounds)");
    }

    let start = Instant::now();
    let mut last_frame = start;
    let mut last_status = start;
    let mut sounds_started = 0;

    println!("Playing (Ctrl+C to stop)");
    loop {
        let now = Instant::now();
        if let Some(limit) = args.seconds {
            if now.duration_since(start).as_secs_f64() >= limit {
                break;
            }
        }

        let delta_ms = now.duration_since(last_frame).as_secs_f64() * 1000.0;
        last_frame = now;
        engine.tick(delta_ms);

        let events = engine.drain_events();
        sounds_started += sound.process_events(&events);
        sound.update();

        if now.duration_since(last_status) >= Duration::from_secs(1) {
            last_status = now;
            let stats = engine.last_stats();
            println!(
                "{:>6.1}s  live {:>5}  shells {:>2}  sounds {:>3} ({} playing)",
                engine.now_ms() / 1000.0,
                stats.live_after,
                engine.active_fireworks(),
                sounds_started,
                sound.in_flight()
            );
        }

        std::thread::sleep(FRAME.saturating_sub(now.elapsed()));
    }

    sound.dispose();
    engine.dispose();
    println!("Show over");
    Ok(())
}
