//! Serializable point-in-time view of a store

use serde::Serialize;

use crate::domain::{Folder, FolderId, Note, NoteId};

/// Read-only copy of the store state, for display and JSON output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSnapshot {
    pub folders: Vec<Folder>,
    pub notes: Vec<Note>,
    pub active_folder: Option<FolderId>,
    pub active_note: Option<NoteId>,
    /// IDs of the notes visible under the active folder, in insertion order
    pub filtered_notes: Vec<NoteId>,
}
