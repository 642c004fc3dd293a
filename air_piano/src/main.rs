//! air_piano — interactive entry point.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info, Level};

use air_piano::config::{AppConfig, TrackingKind};
use air_piano::run;
use strip_midi::GeneralMidi;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fourteen-key air piano strip", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hand-tracking source.
    #[arg(short, long, value_enum)]
    tracking: Option<TrackingKind>,

    /// Keep keys silent.
    #[arg(long, default_value_t = false)]
    no_midi: bool,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Log every strike.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let cfg = load_config(&cli).unwrap_or_else(|e| {
        error!("{}", e);
        process::exit(1);
    });

    info!("🎹 Air Piano");
    #[cfg(feature = "leap")]
    info!("LeapMotion support compiled in");
    #[cfg(not(feature = "leap"))]
    info!("simulation build (use --features leap for hardware)");
    info!(
        tracking = ?cfg.tracking.source,
        midi = cfg.midi.enabled,
        scale = ?cfg.midi.scale,
        instrument = GeneralMidi::from_program(cfg.midi.instrument).map_or("custom", GeneralMidi::name),
        "opening {}x{} window", cfg.window.width, cfg.window.height
    );

    if let Err(e) = run(cfg) {
        error!("{}", e);
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> air_piano::AppResult<AppConfig> {
    let mut cfg = match &cli.config {
        Some(path) => {
            info!("📂 Loading config: {}", path.display());
            AppConfig::load(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(source) = cli.tracking {
        cfg.tracking.source = source;
    }
    if cli.no_midi {
        cfg.midi.enabled = false;
    }
    if let Some(w) = cli.width {
        cfg.window.width = w;
    }
    if let Some(h) = cli.height {
        cfg.window.height = h;
    }

    cfg.validate()?;
    Ok(cfg)
}
