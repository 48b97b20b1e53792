//! Folder domain model
//!
//! Folders group notes. The reserved default folder is created with every
//! store and shows all notes regardless of grouping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::FolderId;

/// Display name of the default folder when configuration does not override it
pub const DEFAULT_FOLDER_NAME: &str = "Все заметки";

/// A named grouping of notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique identifier
    pub id: FolderId,

    /// Display label
    pub name: String,

    /// When the folder was created
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Creates a new folder
    pub fn new(id: FolderId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at,
        }
    }

    /// Creates the catch-all folder
    pub fn default_folder(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::new(FolderId::default_folder(), name, created_at)
    }

    /// Returns true if this is the catch-all folder
    pub fn is_default(&self) -> bool {
        self.id.is_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_folder_is_default() {
        let folder = Folder::default_folder(DEFAULT_FOLDER_NAME, Utc::now());
        assert!(folder.is_default());
        assert_eq!(folder.id.to_string(), "default");
        assert_eq!(folder.name, "Все заметки");
    }

    #[test]
    fn regular_folder_is_not_default() {
        let now = Utc::now();
        let folder = Folder::new(FolderId::new("Work", now, 0), "Work", now);
        assert!(!folder.is_default());
        assert_eq!(folder.created_at, now);
    }
}
