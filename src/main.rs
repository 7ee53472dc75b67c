//! gdrefactor - batch edits for GDevelop project files
//!
//! Each subcommand loads the project, applies one transformation, and
//! writes the file back only when something changed, after copying the
//! original to a timestamped backup next to it.
//!
//! Exit codes:
//!   0 - Success (including read-only runs and runs with nothing to change)
//!   1 - Any error

mod cli;
mod config;
mod error;
mod operations;
mod project;
mod refactor;
mod report;
mod text;
mod user_data;

use anyhow::{Context, Result};
use cli::{Args, Command, OutputFormat, ReportTextTimingArgs, SavesArgs};
use config::{Config, CONFIG_FILE};
use operations::hud::{self, Window};
use operations::layers::{self, CopyLayers};
use operations::{indicators, obstacles, text_timing, zorder, Offset};
use project::document::Document;
use project::Project;
use refactor::{refactor, RefactorOptions, RefactorOutcome, Selector};
use report::generator::{generate_json_report, generate_saves_markdown, generate_text_timing_markdown};
use report::{ReportMetadata, SavesReport, TextTimingReport};
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use user_data::UserData;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("gdrefactor v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    if let Err(e) = run(&args, &config) {
        error!("Refactor failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .gdrefactor.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the project path, backup prefix, and reading times.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    Ok(Config::load_default()?.unwrap_or_default())
}

/// Dispatch the subcommand.
fn run(args: &Args, config: &Config) -> Result<()> {
    let command = args.command.as_ref().context("A subcommand is required")?;

    match command {
        Command::ReportTextTiming(report_args) => return report_text_timing(config, report_args),
        Command::Saves(saves_args) => return report_saves(saves_args),
        _ => {}
    }

    let mut options = RefactorOptions::new(&config.general.project).read_only(args.read_only);
    options.backup = config.backup.enabled;
    options.backup_prefix = config.backup.prefix.clone();

    let outcome = refactor(&options, |project| -> Result<()> {
        let touched = apply(command, project, config)?;
        info!("{} entries touched", touched);
        Ok(())
    })
    .with_context(|| format!("Failed to refactor {}", options.path.display()))?;
    debug!("Finished {}", outcome.project_path().display());

    if !args.quiet {
        print_outcome(&outcome);
    }
    Ok(())
}

/// Apply one editing subcommand to the loaded project.
fn apply(command: &Command, project: &mut Project, config: &Config) -> Result<usize> {
    let levels = config.scene.level_prefix.as_str();

    let touched = match command {
        Command::MoveIndicators(args) => {
            let selector = Selector::new(Some(args.name.as_str()), args.layout.as_deref())?;
            let offset = Offset::from(&args.offset);
            if offset.is_zero() && args.layer.is_none() {
                warn!("Neither an offset nor a layer was given; indicators stay put");
            }
            indicators::move_indicators(project, &selector, offset, args.layer.as_deref())
        }
        Command::MoveObstacles(args) => {
            let selector = Selector::new(Some(args.name.as_str()), args.layout.as_deref())?;
            let offset = Offset::from(&args.offset);
            if offset.is_zero() && args.snap.is_none() {
                warn!("Neither an offset nor a snap grid was given; obstacles stay put");
            }
            obstacles::move_obstacles(project, &selector, offset, args.snap)
        }
        Command::TidyZOrder(args) => {
            let selector = Selector::new(None, args.layout.as_deref())?;
            zorder::tidy_z_order(project, &selector, args.start, args.step)?
        }
        Command::AssignTextTiming(args) => {
            let selector = Selector::new(args.name.as_deref(), args.layout.as_deref())?;
            text_timing::assign_text_timing(project, &selector, &config.text_timing)
        }
        Command::CopyLayers(args) => {
            let targets = Selector::new(None, args.to.as_deref())?;
            let copy = CopyLayers {
                from: args.from.clone(),
                names: args.layers.clone(),
                overwrite: args.overwrite,
            };
            layers::copy_layers(project, &targets, &copy)?
        }
        Command::RemoveBindIndicators => indicators::remove_bind_indicators(project),
        Command::RemoveNonGlobalCounters => hud::remove_non_global_counters(project),
        Command::AddPauseReminders => hud::add_pause_reminders(project, levels),
        Command::AddTransitions => hud::add_transitions(project, levels),
        Command::PositionReminders => hud::position_reminders(project, Window::from(&config.scene)),
        Command::PositionCounters => hud::position_counters(project),
        // reports are dispatched before loading through the pipeline
        Command::ReportTextTiming(_) | Command::Saves(_) => 0,
    };

    Ok(touched)
}

fn print_outcome(outcome: &RefactorOutcome) {
    match outcome {
        RefactorOutcome::Unchanged { project_path } => {
            println!("✔ No changes to {}", project_path.display());
        }
        RefactorOutcome::ReadOnly { project_path } => {
            println!("🔍 {} would change (read-only, nothing written)", project_path.display());
        }
        RefactorOutcome::Written {
            project_path,
            backup_path,
        } => {
            println!("✅ Wrote {}", project_path.display());
            if let Some(backup) = backup_path {
                println!("   Backup: {}", backup.display());
            }
        }
    }
}

/// Report reading times without touching the project.
fn report_text_timing(config: &Config, args: &ReportTextTimingArgs) -> Result<()> {
    let path = &config.general.project;
    let project = Document::load(path)?.project()?;

    let selector = Selector::new(args.filter.name.as_deref(), args.filter.layout.as_deref())?;
    let entries = text_timing::report_text_timing(&project, &selector, &config.text_timing);
    info!("{} text instances", entries.len());

    let report = TextTimingReport::new(ReportMetadata::new(path.display().to_string()), entries);
    let content = match args.format {
        OutputFormat::Markdown => generate_text_timing_markdown(&report),
        OutputFormat::Json => generate_json_report(&report)?,
    };

    emit(&content, args.output.as_deref())
}

/// Summarize a stored user-data file.
fn report_saves(args: &SavesArgs) -> Result<()> {
    let json = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read user data: {}", args.file.display()))?;
    let user_data = UserData::from_json(&json);
    info!("{} saved games", user_data.saved_games.len());

    let report = SavesReport::new(ReportMetadata::new(args.file.display().to_string()), &user_data);
    let content = match args.format {
        OutputFormat::Markdown => generate_saves_markdown(&report),
        OutputFormat::Json => generate_json_report(&report)?,
    };

    emit(&content, args.output.as_deref())
}

/// Write a report to `output`, or stdout.
fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => println!("{}", content.trim_end()),
    }
    Ok(())
}
