//! Note domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{FolderId, NoteId};

/// A titled text document owned by one folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,

    /// Folder this note belongs to
    pub folder_id: FolderId,

    /// Human-readable title
    pub title: String,

    /// Free-form body text
    pub content: String,

    /// When the note was created
    pub created_at: DateTime<Utc>,

    /// When the title or content last changed
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new note; both timestamps start at `now`
    pub fn new(
        id: NoteId,
        folder_id: FolderId,
        title: impl Into<String>,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            folder_id,
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces title and content and refreshes `updated_at`
    pub fn revise(&mut self, title: impl Into<String>, content: impl Into<String>, now: DateTime<Utc>) {
        self.title = title.into();
        self.content = content.into();
        self.updated_at = now;
    }

    /// Returns true if the note belongs to the given folder
    pub fn is_in(&self, folder_id: &FolderId) -> bool {
        &self.folder_id == folder_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_note_has_equal_timestamps() {
        let now = Utc::now();
        let note = Note::new(
            NoteId::new("A", now, 0),
            FolderId::default_folder(),
            "A",
            "B",
            now,
        );
        assert_eq!(note.created_at, note.updated_at);
        assert!(note.is_in(&FolderId::default_folder()));
    }

    #[test]
    fn revise_keeps_identity() {
        let now = Utc::now();
        let folder = FolderId::new("Work", now, 0);
        let mut note = Note::new(NoteId::new("A", now, 1), folder.clone(), "A", "B", now);
        let id = note.id.clone();

        let later = now + Duration::seconds(5);
        note.revise("A2", "B2", later);

        assert_eq!(note.id, id);
        assert_eq!(note.folder_id, folder);
        assert_eq!(note.created_at, now);
        assert_eq!(note.updated_at, later);
        assert_eq!(note.title, "A2");
        assert_eq!(note.content, "B2");
    }

    #[test]
    fn serializes_with_string_ids() {
        let now = Utc::now();
        let note = Note::new(NoteId::new("A", now, 0), FolderId::default_folder(), "A", "", now);
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["folder_id"], "default");
        assert!(json["id"].as_str().unwrap().starts_with("n-"));
    }
}
