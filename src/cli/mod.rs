//! # Command-Line Interface
//!
//! Thin front end over an in-memory [`NotesStore`](crate::store::NotesStore).
//! Nothing is persisted: every invocation starts from a fresh store holding
//! only the default folder.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `shell` | Read store commands from stdin, one per line |
//! | `demo` | Run a short folder/note walkthrough |
//! | `format-date` | Render a timestamp as `DD.MM.YYYY HH:MM:SS` |
//! | `config` | Print the effective configuration |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! `--verbose` (or `-v`) turns on debug logging to stderr.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod shell;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
pub use shell::{tokenize, SessionSummary, Shell};
