//! Command-line interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const LONG_ABOUT: &str = "Drive keyboard and mouse input from body pose.

Optional features select the backends compiled in:
  os-input  inject keys and mouse events into the OS (without it, actions are only logged)
  ml-pyo3   track pose live from the camera through MediaPipe (without it, use --input)

Build with everything: cargo build --release --features os-input,ml-pyo3";

/// Motion Controller - drive keyboard and mouse input from body pose
#[derive(Parser, Debug)]
#[command(name = "motion-controller")]
#[command(author, version, about, long_about = LONG_ABOUT)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the gesture controller
    Run {
        /// JSON-lines landmark stream, or `-` for stdin (default: camera)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Start in mouse mode instead of keyboard mode
        #[arg(long)]
        mouse_mode: bool,

        /// Log input actions instead of injecting them
        #[arg(long)]
        dry_run: bool,

        /// Print one JSON frame report per frame on stdout
        #[arg(long)]
        report: bool,
    },

    /// View or reset configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["motion-controller", "run"]).unwrap();
        assert!(!cli.verbose);
        assert!(cli.config.is_none());

        match cli.command {
            Commands::Run {
                input,
                mouse_mode,
                dry_run,
                report,
            } => {
                assert!(input.is_none());
                assert!(!mouse_mode && !dry_run && !report);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_run_with_all_options() {
        let cli = Cli::try_parse_from([
            "motion-controller",
            "-v",
            "run",
            "--input",
            "-",
            "--mouse-mode",
            "--dry-run",
            "--report",
            "--config",
            "/tmp/settings.json",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/settings.json")));
        match cli.command {
            Commands::Run {
                input,
                mouse_mode,
                dry_run,
                report,
            } => {
                assert_eq!(input, Some(PathBuf::from("-")));
                assert!(mouse_mode && dry_run && report);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::try_parse_from(["motion-controller", "config", "path"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Path
            }
        ));
    }

    #[test]
    fn test_long_help_names_backend_features() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("os-input"));
        assert!(help.contains("ml-pyo3"));
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["motion-controller"]).is_err());
    }
}
