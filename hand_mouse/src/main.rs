//! hand_mouse: entry point.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hand_mouse::app::run;
use hand_mouse::config::{AppConfig, SourceKind};

/// Command-line arguments for hand_mouse
#[derive(Parser, Debug)]
#[command(name = "hand_mouse")]
#[command(version, about = "Drive the mouse with hand gestures", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, env = "HAND_MOUSE_CONFIG", default_value = "hand_mouse.toml")]
    pub config: PathBuf,

    /// Pose source
    #[arg(short, long, value_enum)]
    pub source: Option<SourceKind>,

    /// Screen width in pixels (overrides config and display detection)
    #[arg(long)]
    pub screen_width: Option<f64>,

    /// Screen height in pixels (overrides config and display detection)
    #[arg(long)]
    pub screen_height: Option<f64>,

    /// Start paused
    #[arg(long)]
    pub paused: bool,

    /// Log pointer actions instead of injecting them
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, default_value = "pretty")]
    pub log_format: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Hand Mouse: gesture pointer controller              ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let config = AppConfig::load_or_default(&args.config)?;
    #[cfg(feature = "rdev")]
    let config = {
        let mut config = config;
        if args.screen_width.is_none() && args.screen_height.is_none() {
            config.detect_screen_size();
        }
        config
    };
    let config = config.with_overrides(
        args.source,
        args.screen_width,
        args.screen_height,
        args.paused,
        args.dry_run,
    );
    config.validate()?;

    match config.tracker.source {
        SourceKind::Sim  => println!("  Mode: Keyboard/mouse simulation"),
        SourceKind::Leap => println!("  Mode: LeapMotion hardware"),
    }
    println!(
        "  Screen: {}x{}   Ctrl+Shift+H toggles tracking, Q quits",
        config.mapping.screen_width, config.mapping.screen_height
    );
    println!();

    info!("hand_mouse v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Config: {:?}", config);

    run(config)?;

    info!("hand_mouse shut down");
    Ok(())
}

fn init_logging(args: &Args) {
    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "hand_mouse={level},hand_gesture={level},warn",
            level = log_level
        ))
    });

    match args.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        "compact" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().compact())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
