//! Notes Store - in-memory folders and notes with an active selection
//!
//! The [`store::NotesStore`] owns an ordered list of folders (always starting
//! with the reserved default folder), an ordered list of notes, and the
//! currently selected folder and note. A filtered view shows the notes of
//! the active folder, or every note while the default folder is active.

pub mod cli;
pub mod config;
pub mod domain;
pub mod store;

pub use domain::{Folder, FolderId, Note, NoteId};
pub use store::{NotesStore, StoreEvent};
