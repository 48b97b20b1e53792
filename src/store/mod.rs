//! # Notes Store
//!
//! In-memory registry of folders and notes with an active selection and a
//! filtered view.
//!
//! ## State
//!
//! | Field | Contents |
//! |-------|----------|
//! | folders | Ordered folders; the default folder is always first |
//! | notes | Ordered notes (insertion order) |
//! | active folder | Folder ID or none, default folder at startup |
//! | active note | Note ID or none |
//!
//! Selection is stored by ID and resolved on read, so an edited note is
//! visible through [`NotesStore::active_note`] without re-syncing.
//!
//! ## Lookups
//!
//! Operations addressing an unknown ID are silent no-ops. Their `bool`
//! results say whether anything changed, but callers are free to ignore
//! them. References passed to `add_note`, `set_active_folder` and
//! `set_active_note` are not validated.
//!
//! ## Notification
//!
//! Observers registered with [`NotesStore::subscribe`] receive one
//! [`StoreEvent`] per mutation, after the mutation is complete.

mod events;
mod snapshot;

pub use events::{StoreEvent, SubscriptionId};
pub use snapshot::StoreSnapshot;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{
    Clock, Folder, FolderId, Note, NoteId, SystemClock, TimeDisplay, DEFAULT_FOLDER_NAME,
};
use events::Observers;

/// Construction options for a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Display name of the catch-all folder
    pub default_folder_name: String,

    /// Zone used by [`NotesStore::format_date`]
    pub time_display: TimeDisplay,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            default_folder_name: DEFAULT_FOLDER_NAME.to_string(),
            time_display: TimeDisplay::default(),
        }
    }
}

/// Folders, notes and the current selection
pub struct NotesStore {
    folders: Vec<Folder>,
    notes: Vec<Note>,
    active_folder: Option<FolderId>,
    active_note: Option<NoteId>,
    time_display: TimeDisplay,
    clock: Box<dyn Clock>,
    /// Mixed into generated IDs so equal clock readings never collide
    sequence: u64,
    observers: Observers,
}

impl NotesStore {
    /// Creates a store with the default folder, using the system clock
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default(), SystemClock)
    }

    /// Creates a store reading time from the given clock
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self::with_options(StoreOptions::default(), clock)
    }

    /// Creates a store with explicit options and clock
    pub fn with_options(options: StoreOptions, clock: impl Clock + 'static) -> Self {
        let default_folder = Folder::default_folder(options.default_folder_name, clock.now());
        let active_folder = Some(default_folder.id.clone());

        Self {
            folders: vec![default_folder],
            notes: Vec::new(),
            active_folder,
            active_note: None,
            time_display: options.time_display,
            clock: Box::new(clock),
            sequence: 0,
            observers: Observers::default(),
        }
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// All folders, default first
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// All notes in insertion order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn folder(&self, id: &FolderId) -> Option<&Folder> {
        self.folders.iter().find(|folder| &folder.id == id)
    }

    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    /// The catch-all folder
    pub fn default_folder(&self) -> &Folder {
        // Index 0 is the default folder: it is created first and never removed
        &self.folders[0]
    }

    /// The selected folder ID, which may not name an existing folder
    pub fn active_folder_id(&self) -> Option<&FolderId> {
        self.active_folder.as_ref()
    }

    /// The selected folder, if it exists
    pub fn active_folder(&self) -> Option<&Folder> {
        self.active_folder.as_ref().and_then(|id| self.folder(id))
    }

    /// The selected note ID, which may not name an existing note
    pub fn active_note_id(&self) -> Option<&NoteId> {
        self.active_note.as_ref()
    }

    /// The selected note, if it exists
    pub fn active_note(&self) -> Option<&Note> {
        self.active_note.as_ref().and_then(|id| self.note(id))
    }

    /// Notes visible under the active folder
    ///
    /// Empty with no active folder, every note when the default folder is
    /// active, otherwise the notes whose folder matches. Insertion order.
    pub fn filtered_notes(&self) -> Vec<&Note> {
        match &self.active_folder {
            None => Vec::new(),
            Some(id) if id.is_default() => self.notes.iter().collect(),
            Some(id) => self.notes.iter().filter(|note| note.is_in(id)).collect(),
        }
    }

    /// Formats a timestamp as `DD.MM.YYYY HH:MM:SS` in the configured zone
    pub fn format_date(&self, date: &DateTime<Utc>) -> String {
        self.time_display.format(date)
    }

    /// Copies the current state into a serializable snapshot
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            folders: self.folders.clone(),
            notes: self.notes.clone(),
            active_folder: self.active_folder.clone(),
            active_note: self.active_note.clone(),
            filtered_notes: self
                .filtered_notes()
                .into_iter()
                .map(|note| note.id.clone())
                .collect(),
        }
    }

    // ---------------------------------------------------------------------
    // Observers
    // ---------------------------------------------------------------------

    /// Registers a callback invoked after every state change
    pub fn subscribe(&mut self, callback: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(Box::new(callback))
    }

    /// Removes a callback; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn emit(&mut self, event: StoreEvent) {
        self.observers.notify(&event);
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Selects a folder (or none). The ID is not validated.
    pub fn set_active_folder(&mut self, folder: Option<FolderId>) {
        if self.active_folder == folder {
            return;
        }
        debug!(folder_id = ?folder.as_ref().map(ToString::to_string), "active folder changed");
        self.active_folder = folder.clone();
        self.emit(StoreEvent::ActiveFolderChanged { id: folder });
    }

    /// Selects a note (or none). The ID is not validated.
    pub fn set_active_note(&mut self, note: Option<NoteId>) {
        if self.active_note == note {
            return;
        }
        debug!(note_id = ?note.as_ref().map(ToString::to_string), "active note changed");
        self.active_note = note.clone();
        self.emit(StoreEvent::ActiveNoteChanged { id: note });
    }

    // ---------------------------------------------------------------------
    // Folders
    // ---------------------------------------------------------------------

    fn next_folder_id(&mut self, name: &str, now: DateTime<Utc>) -> FolderId {
        loop {
            self.sequence += 1;
            let id = FolderId::new(name, now, self.sequence);
            if self.folder(&id).is_none() {
                return id;
            }
        }
    }

    fn next_note_id(&mut self, title: &str, now: DateTime<Utc>) -> NoteId {
        loop {
            self.sequence += 1;
            let id = NoteId::new(title, now, self.sequence);
            if self.note(&id).is_none() {
                return id;
            }
        }
    }

    /// Appends a new folder and returns its ID
    pub fn add_folder(&mut self, name: impl Into<String>) -> FolderId {
        let name = name.into();
        let now = self.clock.now();
        let id = self.next_folder_id(&name, now);

        debug!(folder_id = %id, name = %name, "folder added");
        self.folders.push(Folder::new(id.clone(), name, now));
        self.emit(StoreEvent::FolderAdded { id: id.clone() });
        id
    }

    /// Renames a folder. The default folder cannot be renamed.
    pub fn rename_folder(&mut self, id: &FolderId, name: impl Into<String>) -> bool {
        if id.is_default() {
            debug!("refusing to rename the default folder");
            return false;
        }

        let Some(folder) = self.folders.iter_mut().find(|folder| &folder.id == id) else {
            debug!(folder_id = %id, "rename of unknown folder ignored");
            return false;
        };

        folder.name = name.into();
        debug!(folder_id = %id, name = %folder.name, "folder renamed");
        self.emit(StoreEvent::FolderRenamed { id: id.clone() });
        true
    }

    /// Deletes a folder together with its notes
    ///
    /// The default folder is never deleted. If the deleted folder was active,
    /// the default folder becomes active; if the active note lived in it, the
    /// active note is cleared. Returns true if a folder was removed.
    pub fn delete_folder(&mut self, id: &FolderId) -> bool {
        if id.is_default() {
            debug!("refusing to delete the default folder");
            return false;
        }

        let active_note_in_folder = self.active_note().is_some_and(|note| note.is_in(id));

        let mut removed_notes = Vec::new();
        self.notes.retain(|note| {
            if note.is_in(id) {
                removed_notes.push(note.id.clone());
                false
            } else {
                true
            }
        });

        let folders_before = self.folders.len();
        self.folders.retain(|folder| &folder.id != id);
        let removed = self.folders.len() != folders_before;

        let active_folder_reset = self.active_folder.as_ref() == Some(id);
        if active_folder_reset {
            self.active_folder = self.folders.first().map(|folder| folder.id.clone());
        }

        if active_note_in_folder {
            self.active_note = None;
        }

        if !removed && removed_notes.is_empty() && !active_folder_reset && !active_note_in_folder {
            debug!(folder_id = %id, "delete of unknown folder ignored");
            return false;
        }

        debug!(
            folder_id = %id,
            removed_notes = removed_notes.len(),
            active_folder_reset,
            active_note_cleared = active_note_in_folder,
            "folder deleted"
        );
        self.emit(StoreEvent::FolderDeleted {
            id: id.clone(),
            removed_notes,
            active_folder_reset,
            active_note_cleared: active_note_in_folder,
        });
        removed
    }

    // ---------------------------------------------------------------------
    // Notes
    // ---------------------------------------------------------------------

    /// Appends a new note, makes it active and returns its ID
    ///
    /// The folder ID is not validated.
    pub fn add_note(
        &mut self,
        folder_id: FolderId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> NoteId {
        let title = title.into();
        let now = self.clock.now();
        let id = self.next_note_id(&title, now);

        debug!(note_id = %id, folder_id = %folder_id, "note added");
        self.notes
            .push(Note::new(id.clone(), folder_id, title, content, now));
        self.active_note = Some(id.clone());
        self.emit(StoreEvent::NoteAdded { id: id.clone() });
        id
    }

    /// Replaces a note's title and content; unknown IDs are ignored
    pub fn update_note(
        &mut self,
        id: &NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> bool {
        let now = self.clock.now();
        let Some(note) = self.notes.iter_mut().find(|note| &note.id == id) else {
            debug!(note_id = %id, "update of unknown note ignored");
            return false;
        };

        note.revise(title, content, now);
        debug!(note_id = %id, "note updated");
        self.emit(StoreEvent::NoteUpdated { id: id.clone() });
        true
    }

    /// Removes a note; unknown IDs are ignored
    pub fn delete_note(&mut self, id: &NoteId) -> bool {
        let len_before = self.notes.len();
        self.notes.retain(|note| &note.id != id);
        if self.notes.len() == len_before {
            debug!(note_id = %id, "delete of unknown note ignored");
            return false;
        }

        let active_note_cleared = self.active_note.as_ref() == Some(id);
        if active_note_cleared {
            self.active_note = None;
        }

        debug!(note_id = %id, active_note_cleared, "note deleted");
        self.emit(StoreEvent::NoteDeleted {
            id: id.clone(),
            active_note_cleared,
        });
        true
    }
}

impl Default for NotesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NotesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotesStore")
            .field("folders", &self.folders)
            .field("notes", &self.notes)
            .field("active_folder", &self.active_folder)
            .field("active_note", &self.active_note)
            .field("time_display", &self.time_display)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
