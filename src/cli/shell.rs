//! Line-oriented shell over an in-memory store
//!
//! Each input line is one command. Arguments are split on whitespace;
//! single or double quotes group words, and `\` escapes the next character
//! inside double quotes. Blank lines and lines starting with `#` are
//! skipped.
//!
//! Folders and notes can be addressed by ID or by exact name/title. IDs
//! and `none` are matched first, so folder names that look like either
//! are rejected.

use std::io::BufRead;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::debug;

use super::output::Output;
use crate::domain::{FolderId, NoteId};
use crate::store::NotesStore;

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// List all folders
    Folders,

    /// List all notes
    Notes,

    /// List notes visible under the active folder
    List,

    /// Show the active folder and note
    Show,

    /// Create a folder (names shaped like IDs, `default` and `none` are reserved)
    AddFolder {
        name: String,
    },

    /// Rename a folder
    RenameFolder {
        /// Folder ID or name
        folder: String,
        name: String,
    },

    /// Delete a folder and its notes
    DeleteFolder {
        /// Folder ID or name
        folder: String,
    },

    /// Select a folder (`none` clears the selection)
    SelectFolder {
        /// Folder ID, name, or `none`
        folder: String,
    },

    /// Create a note and select it
    AddNote {
        /// Folder ID or name
        folder: String,
        title: String,
        #[arg(default_value = "")]
        content: String,
    },

    /// Replace a note's title and content
    EditNote {
        /// Note ID or title
        note: String,
        title: String,
        #[arg(default_value = "")]
        content: String,
    },

    /// Delete a note
    DeleteNote {
        /// Note ID or title
        note: String,
    },

    /// Select a note (`none` clears the selection)
    SelectNote {
        /// Note ID, title, or `none`
        note: String,
    },

    /// Format an RFC 3339 timestamp
    Date {
        timestamp: String,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

/// Result of running a session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub executed: usize,
    pub failed: usize,
}

enum Flow {
    Continue,
    Quit,
}

/// Interactive session state
pub struct Shell<'a> {
    store: NotesStore,
    output: &'a Output,
}

impl<'a> Shell<'a> {
    pub fn new(mut store: NotesStore, output: &'a Output) -> Self {
        store.subscribe(|event| debug!(?event, "store event"));
        Self { store, output }
    }

    pub fn store(&self) -> &NotesStore {
        &self.store
    }

    /// Executes commands from `input` until end of input or `quit`
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();

        for (line_num, line) in input.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            summary.executed += 1;
            match self.execute(trimmed) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => {
                    summary.failed += 1;
                    self.output
                        .error(&format!("line {}: {:#}", line_num + 1, e));
                }
            }
        }

        Ok(summary)
    }

    fn execute(&mut self, line: &str) -> Result<Flow> {
        let args = tokenize(line)?;
        let parsed = match ShellLine::try_parse_from(&args) {
            Ok(parsed) => parsed,
            Err(e) if matches!(e.kind(), clap::error::ErrorKind::DisplayHelp) => {
                self.output.line(e.to_string().trim_end());
                return Ok(Flow::Continue);
            }
            Err(e) => bail!("{}", e.render().to_string().trim_end()),
        };

        debug!(command = ?parsed.command, "shell command");
        match parsed.command {
            ShellCommand::Folders => self.list_folders(),
            ShellCommand::Notes => {
                let notes: Vec<_> = self.store.notes().iter().collect();
                self.print_notes(&notes);
            }
            ShellCommand::List => {
                let notes = self.store.filtered_notes();
                self.print_notes(&notes);
            }
            ShellCommand::Show => self.show(),
            ShellCommand::AddFolder { name } => {
                check_folder_name(&name)?;
                let id = self.store.add_folder(name.clone());
                if self.output.is_json() {
                    self.output.data(&serde_json::json!({
                        "id": id.to_string(),
                        "name": name,
                    }));
                } else {
                    self.output
                        .success(&format!("Created folder: {} - {}", id, name));
                }
            }
            ShellCommand::RenameFolder { folder, name } => {
                let id = self.resolve_folder(&folder)?;
                if id.is_default() {
                    bail!("The default folder cannot be renamed");
                }
                check_folder_name(&name)?;
                if !self.store.rename_folder(&id, name.clone()) {
                    bail!("Folder not found: {}", id);
                }
                self.output.success(&format!("Renamed folder {} to {}", id, name));
            }
            ShellCommand::DeleteFolder { folder } => {
                let id = self.resolve_folder(&folder)?;
                if id.is_default() {
                    bail!("The default folder cannot be deleted");
                }
                let notes_before = self.store.notes().len();
                let selection_before = (
                    self.store.active_folder_id().cloned(),
                    self.store.active_note_id().cloned(),
                );

                let folder_removed = self.store.delete_folder(&id);
                let removed = notes_before - self.store.notes().len();
                let selection_after = (
                    self.store.active_folder_id().cloned(),
                    self.store.active_note_id().cloned(),
                );

                // An unknown ID can still purge notes filed under it
                if folder_removed {
                    self.output.success(&format!(
                        "Deleted folder {} ({} note(s) removed)",
                        id, removed
                    ));
                } else if removed > 0 || selection_before != selection_after {
                    self.output.success(&format!(
                        "No folder {}; removed {} note(s) filed under it",
                        id, removed
                    ));
                } else {
                    bail!("Folder not found: {}", id);
                }
            }
            ShellCommand::SelectFolder { folder } => {
                let id = if is_none(&folder) {
                    None
                } else {
                    Some(self.resolve_folder(&folder)?)
                };
                let label = id.as_ref().map_or("none".to_string(), ToString::to_string);
                self.store.set_active_folder(id);
                self.output.success(&format!("Active folder: {}", label));
            }
            ShellCommand::AddNote {
                folder,
                title,
                content,
            } => {
                let folder_id = self.resolve_folder(&folder)?;
                let id = self.store.add_note(folder_id.clone(), title.clone(), content);
                if self.output.is_json() {
                    self.output.data(&serde_json::json!({
                        "id": id.to_string(),
                        "folder_id": folder_id.to_string(),
                        "title": title,
                    }));
                } else {
                    self.output.success(&format!("Created note: {} - {}", id, title));
                }
            }
            ShellCommand::EditNote {
                note,
                title,
                content,
            } => {
                let id = self.resolve_note(&note)?;
                if !self.store.update_note(&id, title, content) {
                    bail!("Note not found: {}", id);
                }
                self.output.success(&format!("Updated note: {}", id));
            }
            ShellCommand::DeleteNote { note } => {
                let id = self.resolve_note(&note)?;
                if !self.store.delete_note(&id) {
                    bail!("Note not found: {}", id);
                }
                self.output.success(&format!("Deleted note: {}", id));
            }
            ShellCommand::SelectNote { note } => {
                let id = if is_none(&note) {
                    None
                } else {
                    Some(self.resolve_note(&note)?)
                };
                let label = id.as_ref().map_or("none".to_string(), ToString::to_string);
                self.store.set_active_note(id);
                self.output.success(&format!("Active note: {}", label));
            }
            ShellCommand::Date { timestamp } => {
                let date = parse_timestamp(&timestamp)?;
                let formatted = self.store.format_date(&date);
                if self.output.is_json() {
                    self.output.data(&serde_json::json!({ "formatted": formatted }));
                } else {
                    self.output.line(&formatted);
                }
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Resolves a folder by ID, falling back to an exact name match
    ///
    /// Well-formed IDs are accepted even if no such folder exists.
    fn resolve_folder(&self, reference: &str) -> Result<FolderId> {
        if let Ok(id) = reference.parse::<FolderId>() {
            return Ok(id);
        }
        self.store
            .folders()
            .iter()
            .find(|folder| folder.name == reference)
            .map(|folder| folder.id.clone())
            .ok_or_else(|| anyhow!("No folder with ID or name '{}'", reference))
    }

    /// Resolves a note by ID, falling back to an exact title match
    fn resolve_note(&self, reference: &str) -> Result<NoteId> {
        if let Ok(id) = reference.parse::<NoteId>() {
            return Ok(id);
        }
        self.store
            .notes()
            .iter()
            .find(|note| note.title == reference)
            .map(|note| note.id.clone())
            .ok_or_else(|| anyhow!("No note with ID or title '{}'", reference))
    }

    fn list_folders(&self) {
        let active = self.store.active_folder_id();

        if self.output.is_json() {
            let items: Vec<_> = self
                .store
                .folders()
                .iter()
                .map(|folder| {
                    serde_json::json!({
                        "id": folder.id.to_string(),
                        "name": folder.name,
                        "created_at": folder.created_at,
                        "active": Some(&folder.id) == active,
                    })
                })
                .collect();
            self.output.data(&items);
            return;
        }

        for folder in self.store.folders() {
            let marker = if Some(&folder.id) == active { "*" } else { " " };
            let created = self.store.format_date(&folder.created_at);
            self.output
                .row(&[marker, &folder.id.to_string(), &folder.name, &created]);
        }
    }

    fn print_notes(&self, notes: &[&crate::domain::Note]) {
        if self.output.is_json() {
            self.output.data(&notes);
            return;
        }

        if notes.is_empty() {
            self.output.line("No notes");
            return;
        }

        let active = self.store.active_note_id();
        for note in notes {
            let marker = if Some(&note.id) == active { "*" } else { " " };
            let updated = self.store.format_date(&note.updated_at);
            self.output.row(&[
                marker,
                &note.id.to_string(),
                &note.folder_id.to_string(),
                &note.title,
                &updated,
            ]);
        }
    }

    fn show(&self) {
        if self.output.is_json() {
            self.output.data(&self.store.snapshot());
            return;
        }

        match self.store.active_folder() {
            Some(folder) => self
                .output
                .line(&format!("Active folder: {} ({})", folder.name, folder.id)),
            None => match self.store.active_folder_id() {
                Some(id) => self.output.line(&format!("Active folder: {} (unknown)", id)),
                None => self.output.line("Active folder: none"),
            },
        }

        match self.store.active_note() {
            Some(note) => {
                self.output
                    .line(&format!("Active note: {} ({})", note.title, note.id));
                self.output.line(&format!(
                    "  created {}, updated {}",
                    self.store.format_date(&note.created_at),
                    self.store.format_date(&note.updated_at)
                ));
                if !note.content.is_empty() {
                    self.output.line(&format!("  {}", note.content));
                }
            }
            None => self.output.line("Active note: none"),
        }

        self.output.line(&format!(
            "{} folder(s), {} note(s), {} visible",
            self.store.folders().len(),
            self.store.notes().len(),
            self.store.filtered_notes().len()
        ));
    }
}

fn is_none(reference: &str) -> bool {
    reference.eq_ignore_ascii_case("none")
}

/// Rejects folder names that would resolve to something else
///
/// `none` and anything shaped like a folder ID (including `default`) are
/// matched before names, so such a folder could never be addressed by name.
fn check_folder_name(name: &str) -> Result<()> {
    if is_none(name) || name.parse::<FolderId>().is_ok() {
        bail!("'{}' is reserved and cannot be used as a folder name", name);
    }
    Ok(())
}

/// Parses an RFC 3339 timestamp into UTC
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|date| date.with_timezone(&Utc))
        .with_context(|| format!("Invalid RFC 3339 timestamp: {}", input))
}

/// Splits a command line into arguments
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some('"') if c == '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => bail!("Trailing backslash"),
            },
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        args.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }

    if let Some(q) = quote {
        bail!("Unterminated {} quote", q);
    }
    if in_token {
        args.push(current);
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::OutputFormat;
    use std::io::Cursor;

    fn run_script(script: &str) -> (NotesStore, SessionSummary) {
        let output = Output::new(OutputFormat::Json);
        let mut shell = Shell::new(NotesStore::new(), &output);
        let summary = shell.run(Cursor::new(script.to_string())).unwrap();
        (shell.store, summary)
    }

    #[test]
    fn tokenize_plain_and_quoted() {
        assert_eq!(
            tokenize("add-note Work \"Shopping list\" 'milk, eggs'").unwrap(),
            vec!["add-note", "Work", "Shopping list", "milk, eggs"]
        );
        assert_eq!(tokenize("  folders  ").unwrap(), vec!["folders"]);
        assert_eq!(tokenize("x \"\"").unwrap(), vec!["x", ""]);
        assert_eq!(
            tokenize(r#"say "a \"quoted\" word""#).unwrap(),
            vec!["say", "a \"quoted\" word"]
        );
    }

    #[test]
    fn tokenize_rejects_unterminated_quote() {
        assert!(tokenize("add-folder \"Work").is_err());
    }

    #[test]
    fn scenario_by_name() {
        let (store, summary) = run_script(
            "add-folder Work\n\
             add-note Work A B\n\
             select-folder default\n\
             select-folder Work\n",
        );
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.executed, 4);
        assert_eq!(store.folders().len(), 2);
        assert_eq!(store.filtered_notes().len(), 1);
        assert_eq!(store.active_note().unwrap().title, "A");
    }

    #[test]
    fn delete_folder_by_name() {
        let (store, summary) = run_script(
            "add-folder Work\n\
             add-note Work A B\n\
             select-folder Work\n\
             delete-folder Work\n",
        );
        assert_eq!(summary.failed, 0);
        assert_eq!(store.folders().len(), 1);
        assert!(store.notes().is_empty());
        assert!(store.active_folder().unwrap().is_default());
        assert!(store.active_note().is_none());
    }

    #[test]
    fn errors_do_not_stop_the_session() {
        let (store, summary) = run_script(
            "delete-folder default\n\
             frobnicate\n\
             edit-note Missing x\n\
             add-folder Kept\n",
        );
        assert_eq!(summary.executed, 4);
        assert_eq!(summary.failed, 3);
        assert_eq!(store.folders().len(), 2);
    }

    #[test]
    fn quit_stops_reading() {
        let (store, summary) = run_script("add-folder One\nquit\nadd-folder Two\n");
        assert_eq!(summary.executed, 2);
        assert_eq!(store.folders().len(), 2);
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let (_, summary) = run_script("# setup\n\nfolders\n");
        assert_eq!(summary.executed, 1);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn edit_and_select_notes() {
        let (store, summary) = run_script(
            "add-note default First one\n\
             add-note default Second two\n\
             select-note First\n\
             edit-note First Renamed body\n\
             select-note none\n\
             delete-note Second\n",
        );
        assert_eq!(summary.failed, 0);
        assert_eq!(store.notes().len(), 1);
        assert_eq!(store.notes()[0].title, "Renamed");
        assert_eq!(store.notes()[0].content, "body");
        assert!(store.active_note().is_none());
    }

    #[test]
    fn delete_unknown_folder_purges_orphans() {
        let (store, summary) = run_script(
            "add-note f-0000000 Orphan x\n\
             add-note default Kept y\n\
             delete-folder f-0000000\n",
        );
        assert_eq!(summary.failed, 0);
        assert_eq!(store.notes().len(), 1);
        assert_eq!(store.notes()[0].title, "Kept");
    }

    #[test]
    fn delete_unknown_folder_without_orphans_fails() {
        let (_, summary) = run_script("delete-folder f-0000000\n");
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn reserved_folder_names_rejected() {
        let (store, summary) = run_script(
            "add-folder none\n\
             add-folder default\n\
             add-folder f-1234567\n\
             add-folder Work\n\
             rename-folder Work NONE\n",
        );
        assert_eq!(summary.failed, 4);
        assert_eq!(store.folders().len(), 2);
        assert_eq!(store.folders()[1].name, "Work");
    }

    #[test]
    fn help_is_not_an_error() {
        let (_, summary) = run_script("help\n");
        assert_eq!(summary.executed, 1);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn parse_timestamp_normalizes_to_utc() {
        let date = parse_timestamp("2024-03-05T10:08:09+03:00").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-05T07:08:09+00:00");
        assert!(parse_timestamp("yesterday").is_err());
    }
}
