// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

use cli::{CalcArgs, RoiArg};

#[derive(Parser)]
#[command(name = "boxfill")]
#[command(about = "Depth-camera region spatials and container fill estimation")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure spatial coordinates of a region in a depth image
    Measure {
        /// 16-bit depth image (millimeters)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        roi: RoiArg,

        #[command(flatten)]
        calc: CalcArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Estimate container fullness from calibrated readings
    Fill {
        /// Depth image of the current state
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        roi: RoiArg,

        /// Empty-box distance in millimeters
        #[arg(long, conflicts_with = "empty_frame")]
        empty_mm: Option<f32>,

        /// Depth image of the empty box
        #[arg(long)]
        empty_frame: Option<PathBuf>,

        /// Full-box distance in millimeters
        #[arg(long, conflicts_with = "full_frame")]
        full_mm: Option<f32>,

        /// Depth image of the full box
        #[arg(long)]
        full_frame: Option<PathBuf>,

        #[command(flatten)]
        calc: CalcArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Measure a region on every frame until stopped
    Watch {
        /// Depth image or directory of images (default: synthetic scene)
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        roi: RoiArg,

        /// Stop after this many frames
        #[arg(short = 'n', long)]
        frames: Option<u64>,

        /// Pause between frames in milliseconds
        #[arg(long, default_value_t = boxfill::constants::timing::WATCH_INTERVAL_MS)]
        interval_ms: u64,

        /// Empty-box distance in millimeters
        #[arg(long)]
        empty_mm: Option<f32>,

        /// Full-box distance in millimeters
        #[arg(long, requires = "empty_mm")]
        full_mm: Option<f32>,

        #[command(flatten)]
        calc: CalcArgs,

        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Interactive terminal viewer (default)
    Terminal {
        /// Depth image or directory of images (default: synthetic scene)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Initial region: x,y or x1,y1,x2,y2
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        roi: Vec<i32>,

        #[command(flatten)]
        calc: CalcArgs,
    },

    /// Write synthetic depth images
    Synth {
        /// Output file, or directory when writing several frames
        #[arg(short, long)]
        output: PathBuf,

        /// First frame index of the fill cycle
        #[arg(long, default_value = "0")]
        start: u64,

        /// Number of frames to write
        #[arg(short = 'n', long, default_value = "1")]
        count: u64,
    },

    /// Show or reset the configuration
    Config {
        /// Overwrite the config file with defaults
        #[arg(long)]
        reset: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=boxfill=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(boxfill::Config::default_path);

    match cli.command {
        Some(Commands::Measure {
            input,
            roi,
            calc,
            json,
        }) => cli::measure(&config_path, &input, &roi, &calc, json),
        Some(Commands::Fill {
            input,
            roi,
            empty_mm,
            empty_frame,
            full_mm,
            full_frame,
            calc,
            json,
        }) => cli::fill(
            &config_path,
            &input,
            &roi,
            cli::Reference::from_args(empty_mm, empty_frame),
            cli::Reference::from_args(full_mm, full_frame),
            &calc,
            json,
        ),
        Some(Commands::Watch {
            input,
            roi,
            frames,
            interval_ms,
            empty_mm,
            full_mm,
            calc,
            json,
        }) => cli::watch(
            &config_path,
            input.as_deref(),
            &roi,
            cli::WatchOptions {
                frames,
                interval_ms,
                empty_mm,
                full_mm,
                json,
            },
            &calc,
        ),
        Some(Commands::Terminal { input, roi, calc }) => {
            cli::terminal(&config_path, input.as_deref(), &roi, &calc)
        }
        Some(Commands::Synth {
            output,
            start,
            count,
        }) => cli::synth(&config_path, &output, start, count),
        Some(Commands::Config { reset }) => cli::show_config(&config_path, reset),
        None => cli::terminal(&config_path, None, &[], &CalcArgs::default()),
    }
}
