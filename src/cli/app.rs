//! Main CLI application structure

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};

use super::output::{Output, OutputFormat};
use super::shell::{parse_timestamp, Shell};
use crate::config::Config;
use crate::domain::{FolderId, SystemClock, TimeDisplay};
use crate::store::NotesStore;

#[derive(Parser)]
#[command(name = "notes")]
#[command(author, version, about = "In-memory folders and notes")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to a config file (defaults to the user config directory)
    #[arg(long, global = true, env = "NOTES_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run commands from stdin against a fresh store
    ///
    /// Example:
    ///   printf 'add-folder Work\nadd-note Work "Plan" "Q3"\nlist\n' | notes shell
    Shell {
        /// Exit with an error if any command failed
        #[arg(long)]
        strict: bool,
    },

    /// Walk through a short folder/note scenario
    Demo,

    /// Format an RFC 3339 timestamp as DD.MM.YYYY HH:MM:SS
    FormatDate {
        /// Timestamp, e.g. 2024-03-05T07:08:09Z
        timestamp: String,

        /// Render in UTC instead of the configured zone
        #[arg(long)]
        utc: bool,
    },

    /// Show the effective configuration
    Config,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let output = Output::new(cli.format);

    debug!("notes starting");
    let config = Config::load(cli.config.as_deref())?;
    debug!(mode = config.mode.as_str(), base_path = config.base_path(), "configuration loaded");

    match cli.command {
        Commands::Shell { strict } => {
            let store = NotesStore::with_options(config.store_options(), SystemClock);
            let mut shell = Shell::new(store, &output);
            let summary = shell.run(io::stdin().lock())?;
            debug!(executed = summary.executed, failed = summary.failed, "shell finished");
            if strict && summary.failed > 0 {
                bail!("{} of {} command(s) failed", summary.failed, summary.executed);
            }
        }

        Commands::Demo => demo(&output, &config),

        Commands::FormatDate { timestamp, utc } => {
            let date = parse_timestamp(&timestamp)?;
            let display = if utc { TimeDisplay::Utc } else { config.time_display };
            let formatted = display.format(&date);
            if output.is_json() {
                output.data(&serde_json::json!({
                    "input": timestamp,
                    "formatted": formatted,
                }));
            } else {
                output.line(&formatted);
            }
        }

        Commands::Config => show_config(&output, &config),
    }

    debug!("command completed successfully");
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Creates a folder, adds a note, switches folders, then deletes the folder
fn demo(output: &Output, config: &Config) {
    let mut store = NotesStore::with_options(config.store_options(), SystemClock);

    let work = store.add_folder("Work");
    output.line(&format!("add-folder Work       -> {} folder(s)", store.folders().len()));

    store.add_note(work.clone(), "A", "B");
    let active_title = store.active_note().map_or("none", |note| note.title.as_str());
    output.line(&format!(
        "add-note A            -> {} note(s), active note '{}'",
        store.notes().len(),
        active_title
    ));

    store.set_active_folder(Some(FolderId::default_folder()));
    output.line(&format!(
        "select default folder -> {} visible",
        store.filtered_notes().len()
    ));

    store.set_active_folder(Some(work.clone()));
    output.line(&format!(
        "select Work           -> {} visible",
        store.filtered_notes().len()
    ));

    store.delete_folder(&work);
    let active_folder = store
        .active_folder()
        .map_or("none".to_string(), |folder| folder.name.clone());
    output.line(&format!(
        "delete-folder Work    -> {} folder(s), {} note(s), active folder '{}', active note {}",
        store.folders().len(),
        store.notes().len(),
        active_folder,
        if store.active_note().is_some() { "set" } else { "none" }
    ));

    if output.is_json() {
        output.data(&store.snapshot());
    }
}

fn show_config(output: &Output, config: &Config) {
    if output.is_json() {
        output.data(&serde_json::json!({
            "mode": config.mode,
            "dev_path": config.dev_path,
            "prod_path": config.prod_path,
            "base_path": config.base_path(),
            "default_folder_name": config.default_folder_name,
            "time_display": config.time_display,
        }));
        return;
    }

    output.row(&["mode", config.mode.as_str()]);
    output.row(&["dev_path", &config.dev_path]);
    output.row(&["prod_path", &config.prod_path]);
    output.row(&["base_path", config.base_path()]);
    output.row(&["default_folder_name", &config.default_folder_name]);
    output.row(&["time_display", config.time_display.as_str()]);
}
