//! Motion Controller
//!
//! Turns body-pose landmarks into keyboard and mouse input.

mod cli;

use anyhow::Context;
use cli::{Cli, Commands, ConfigAction};
use motion_controller_lib::core::config::Config;
use motion_controller_lib::core::gesture_controller::GestureController;
use motion_controller_lib::core::session::run_session;
use motion_controller_lib::models::input::Mode;
use motion_controller_lib::platform::input::create_sink;
use motion_controller_lib::platform::pose::{BackgroundSource, JsonLinesSource, LandmarkSource};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so --verbose can set the log level
    let cli = Cli::parse_args();

    // Logs go to stderr so --report output on stdout stays clean
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::get_config_path()?,
    };

    match cli.command {
        Commands::Run {
            input,
            mouse_mode,
            dry_run,
            report,
        } => {
            let config = Config::load_from(&config_path)
                .with_context(|| format!("Failed to load config from {:?}", config_path))?;
            run_controller(input, mouse_mode, dry_run, report, &config)?;
        }
        Commands::Config { action } => {
            run_config(action, &config_path)?;
        }
    }

    Ok(())
}

fn run_controller(
    input: Option<PathBuf>,
    mouse_mode: bool,
    dry_run: bool,
    report: bool,
    config: &Config,
) -> anyhow::Result<()> {
    // Set up Ctrl+C handler
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_handler = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_handler.store(true, Ordering::SeqCst);
    })?;

    let mut source = open_source(input, config, stop_flag.clone())?;

    let mut controller = GestureController::new(config, create_sink(dry_run));
    if mouse_mode {
        controller.set_mode(Mode::Mouse);
    }

    info!("Controller running... Press Ctrl+C to stop");

    let summary = run_session(&mut controller, &mut source, &stop_flag, |frame| {
        if !report {
            return;
        }
        match serde_json::to_string(frame) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Failed to serialize frame report: {}", e),
        }
    })
    .with_context(|| format!("Landmark source {} failed", source.describe()))?;

    info!(
        "Stopped: {} ({} frames, {} lines released on exit)",
        summary.reason.to_string(),
        summary.counts.frames,
        summary.released_on_exit
    );

    Ok(())
}

/// Recorded streams are read on a background thread so Ctrl+C is noticed
/// even while a pipe is idle.
fn open_source(
    input: Option<PathBuf>,
    config: &Config,
    stop: Arc<AtomicBool>,
) -> anyhow::Result<Box<dyn LandmarkSource>> {
    let Some(path) = input else {
        return open_camera(config);
    };

    let source = if path == Path::new("-") {
        BackgroundSource::spawn("json-lines (stdin)", stop, || Ok(JsonLinesSource::stdin()))?
    } else {
        if !path.exists() {
            anyhow::bail!("Landmark file not found: {:?}", path);
        }
        let label = format!("json-lines ({})", path.display());
        BackgroundSource::spawn(label, stop, move || JsonLinesSource::open(&path))?
    };

    Ok(Box::new(source))
}

#[cfg(feature = "ml-pyo3")]
fn open_camera(config: &Config) -> anyhow::Result<Box<dyn LandmarkSource>> {
    use motion_controller_lib::platform::pose::MediaPipeBridge;

    let bridge = MediaPipeBridge::new(config).context("Failed to start MediaPipe pose tracking")?;
    Ok(Box::new(bridge))
}

#[cfg(not(feature = "ml-pyo3"))]
fn open_camera(_config: &Config) -> anyhow::Result<Box<dyn LandmarkSource>> {
    anyhow::bail!(
        "No --input given and camera tracking is not available in this build (enable the `ml-pyo3` feature)"
    )
}

fn run_config(action: ConfigAction, config_path: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_from(config_path)?;
            println!("Configuration ({:?}):\n", config_path);
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::reset_at(config_path)?;
            println!("Configuration reset to defaults at {:?}", config_path);
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}
