//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gdrefactor - batch edits for GDevelop project files
///
/// Every editing command loads the project, applies one transformation, and
/// writes the file back only if something changed, after copying the
/// original to a timestamped backup next to it.
///
/// Examples:
///   gdrefactor move-indicators --dx 0 --dy -16
///   gdrefactor --read-only tidy-z-order --layout '^L_'
///   gdrefactor -p game.json copy-layers --from L_1 --to '^L_' --layer Transition
///   gdrefactor report-text-timing --format json
///   gdrefactor saves ~/.config/unbound/userData.json
///   gdrefactor --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Project file to edit
    ///
    /// Defaults to `general.project` from .gdrefactor.toml, or ./unbound.json.
    #[arg(short, long, global = true, value_name = "FILE", env = "GDREFACTOR_PROJECT")]
    pub path: Option<PathBuf>,

    /// Run the transformation but never write the project
    #[arg(short, long, global = true)]
    pub read_only: bool,

    /// Overwrite the project without making a backup first
    #[arg(long, global = true)]
    pub no_backup: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .gdrefactor.toml in the current directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .gdrefactor.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Move key-binding indicator instances
    MoveIndicators(MoveIndicatorsArgs),
    /// Move obstacle instances, optionally snapping them to a grid
    MoveObstacles(MoveObstaclesArgs),
    /// Renumber z-orders densely per layer, keeping their relative order
    TidyZOrder(TidyZOrderArgs),
    /// Store a reading time on every text instance
    AssignTextTiming(TextTimingArgs),
    /// Report reading times of text instances without editing the project
    ReportTextTiming(ReportTextTimingArgs),
    /// Copy layers from one scene into others
    CopyLayers(CopyLayersArgs),
    /// Remove every BindIndicator instance
    RemoveBindIndicators,
    /// Remove the per-scene counter objects that are now global
    RemoveNonGlobalCounters,
    /// Add a pause reminder to every level that lacks one
    AddPauseReminders,
    /// Add the transition instance and layer to every level
    AddTransitions,
    /// Place reset and pause reminders relative to the window
    PositionReminders,
    /// Place the unbound-key counters in the UI layer
    PositionCounters,
    /// Summarize a stored user-data file
    Saves(SavesArgs),
}

/// Translation applied to matched instances.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Offset {
    /// Horizontal offset in pixels
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub dx: f64,

    /// Vertical offset in pixels
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub dy: f64,
}

#[derive(clap::Args, Debug, Clone)]
pub struct MoveIndicatorsArgs {
    /// Instance name pattern (regex)
    #[arg(long, default_value = "BindIndicator")]
    pub name: String,

    /// Only touch layouts whose name matches this pattern (regex)
    #[arg(long, value_name = "PATTERN")]
    pub layout: Option<String>,

    #[command(flatten)]
    pub offset: Offset,

    /// Move the instances onto this layer
    #[arg(long)]
    pub layer: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct MoveObstaclesArgs {
    /// Instance name pattern (regex)
    #[arg(long, default_value = "^Obstacle")]
    pub name: String,

    /// Only touch layouts whose name matches this pattern (regex)
    #[arg(long, value_name = "PATTERN")]
    pub layout: Option<String>,

    #[command(flatten)]
    pub offset: Offset,

    /// Round the resulting coordinates to a multiple of this grid size
    #[arg(long, value_name = "PIXELS")]
    pub snap: Option<f64>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TidyZOrderArgs {
    /// Only touch layouts whose name matches this pattern (regex)
    #[arg(long, value_name = "PATTERN")]
    pub layout: Option<String>,

    /// First z-order on each layer
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub start: i64,

    /// Gap between consecutive z-orders
    #[arg(long, default_value = "1")]
    pub step: i64,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TextTimingArgs {
    /// Only touch layouts whose name matches this pattern (regex)
    #[arg(long, value_name = "PATTERN")]
    pub layout: Option<String>,

    /// Only touch instances whose name matches this pattern (regex)
    #[arg(long, value_name = "PATTERN")]
    pub name: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ReportTextTimingArgs {
    #[command(flatten)]
    pub filter: TextTimingArgs,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CopyLayersArgs {
    /// Layout to copy layers from
    #[arg(long, value_name = "LAYOUT")]
    pub from: String,

    /// Layouts to copy into (regex); defaults to every other layout
    #[arg(long, value_name = "PATTERN")]
    pub to: Option<String>,

    /// Only copy layers with this name (repeatable)
    #[arg(long = "layer", value_name = "NAME")]
    pub layers: Vec<String>,

    /// Replace layers that already exist in the target
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SavesArgs {
    /// Stored user-data JSON file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the summary here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        let Some(ref command) = self.command else {
            return Err("A subcommand is required (see --help)".to_string());
        };

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match command {
            Command::MoveObstacles(args) => {
                if let Some(snap) = args.snap {
                    if snap <= 0.0 {
                        return Err("Snap grid must be greater than zero".to_string());
                    }
                }
            }
            Command::TidyZOrder(args) => {
                if args.step <= 0 {
                    return Err("Z-order step must be at least 1".to_string());
                }
            }
            Command::CopyLayers(args) => {
                if args.from.is_empty() {
                    return Err("Source layout name must not be empty".to_string());
                }
            }
            Command::Saves(args) => {
                if !args.file.exists() {
                    return Err(format!(
                        "User-data file does not exist: {}",
                        args.file.display()
                    ));
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args(command: Command) -> Args {
        Args {
            path: None,
            read_only: false,
            no_backup: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
            command: Some(command),
        }
    }

    #[test]
    fn test_parse_subcommand_with_global_flags() {
        let args = Args::try_parse_from([
            "gdrefactor",
            "move-indicators",
            "--dy",
            "-16",
            "--read-only",
            "-p",
            "game.json",
        ])
        .unwrap();

        assert!(args.read_only);
        assert_eq!(args.path, Some(PathBuf::from("game.json")));
        match args.command {
            Some(Command::MoveIndicators(move_args)) => {
                assert_eq!(move_args.name, "BindIndicator");
                assert_eq!(move_args.offset.dx, 0.0);
                assert_eq!(move_args.offset.dy, -16.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_copy_layers_repeated() {
        let args = Args::try_parse_from([
            "gdrefactor",
            "copy-layers",
            "--from",
            "L_1",
            "--layer",
            "UI",
            "--layer",
            "Transition",
        ])
        .unwrap();

        match args.command {
            Some(Command::CopyLayers(copy)) => {
                assert_eq!(copy.layers, vec!["UI", "Transition"]);
                assert!(copy.to.is_none());
                assert!(!copy.overwrite);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_validation_requires_command() {
        let mut args = make_args(Command::AddTransitions);
        args.command = None;
        assert!(args.validate().is_err());

        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args(Command::PositionCounters);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_bad_step() {
        let args = make_args(Command::TidyZOrder(TidyZOrderArgs {
            layout: None,
            start: 1,
            step: 0,
        }));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(Command::AddTransitions);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
