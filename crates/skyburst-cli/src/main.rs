//! Skyburst CLI - run, inspect and listen to firework shows

mod commands;
mod show;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{init, play, shells, simulate, snapshot};

#[derive(Parser)]
#[command(name = "skyburst")]
#[command(about = "Procedural firework show simulator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default show file
    Init {
        /// Show file path
        #[arg(default_value = "show.toml")]
        path: String,

        /// Canvas width
        #[arg(long, default_value = "800")]
        width: f32,

        /// Canvas height
        #[arg(long, default_value = "600")]
        height: f32,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List registered shell types
    Shells {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Run a show headless and print particle statistics
    Simulate {
        /// Path to show file
        #[arg(long)]
        show: Option<String>,

        /// Simulated duration in seconds
        #[arg(long, default_value = "10")]
        seconds: f64,

        /// Seconds per report line
        #[arg(long, default_value = "1")]
        interval: f64,

        /// Override the RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Shell type for autoplay (a registered name or "random")
        #[arg(long)]
        shell: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Step a show and dump its snapshot as JSON
    Snapshot {
        /// Path to show file
        #[arg(long)]
        show: Option<String>,

        /// Simulation steps to run first
        #[arg(long, default_value = "120")]
        steps: u64,

        /// Override the RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Launch one shell at this x before stepping
        #[arg(long)]
        launch: Option<f32>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Play a show in real time with sound
    Play {
        /// Path to show file
        #[arg(long)]
        show: Option<String>,

        /// Stop after this many seconds
        #[arg(long)]
        seconds: Option<f64>,

        /// Start muted
        #[arg(long)]
        mute: bool,

        /// Directory of category sounds (overrides the show file)
        #[arg(long)]
        sounds: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            path,
            width,
            height,
            force,
        } => init::run(init::InitArgs {
            path,
            width,
            height,
            force,
        }),
        Commands::Shells { format } => shells::run(&format),
        Commands::Simulate {
            show,
            seconds,
            interval,
            seed,
            shell,
            format,
        } => simulate::run(simulate::SimulateArgs {
            show,
            seconds,
            interval,
            seed,
            shell,
            format,
        }),
        Commands::Snapshot {
            show,
            steps,
            seed,
            launch,
            output,
            compact,
        } => snapshot::run(snapshot::SnapshotArgs {
            show,
            steps,
            seed,
            launch_x: launch,
            output,
            compact,
        }),
        Commands::Play {
            show,
            seconds,
            mute,
            sounds,
        } => play::run(play::PlayArgs {
            show,
            seconds,
            mute,
            sounds,
        }),
    }
}
