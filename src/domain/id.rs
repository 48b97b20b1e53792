//! Identifiers for folders and notes
//!
//! ID Format:
//! - Default folder: `default` (reserved, exactly one per store)
//! - Folder IDs: `f-{7-char-hash}` (e.g., `f-7f2b4c1`)
//! - Note IDs: `n-{7-char-hash}` (e.g., `n-9d3e5f2`)
//!
//! Hash is derived from the label, the creation timestamp and a per-store
//! sequence number, so two entities created within the same clock tick
//! still get distinct IDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reserved identifier of the catch-all folder
pub const DEFAULT_FOLDER_ID: &str = "default";

const HASH_LEN: usize = 7;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid folder ID format: expected 'default' or 'f-{{7-char-hash}}', got '{0}'")]
    InvalidFolderId(String),

    #[error("Invalid note ID format: expected 'n-{{7-char-hash}}', got '{0}'")]
    InvalidNoteId(String),
}

/// Generates a 7-character hash from label, timestamp and sequence
fn generate_hash(label: &str, timestamp: DateTime<Utc>, sequence: u64) -> String {
    let input = format!(
        "{}{}:{}",
        label,
        timestamp.timestamp_nanos_opt().unwrap_or(0),
        sequence
    );
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..HASH_LEN].to_string()
}

fn is_hash(s: &str) -> bool {
    s.len() == HASH_LEN && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Folder ID, either the reserved `default` or `f-{hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FolderId {
    /// `None` for the default folder
    hash: Option<String>,
}

impl FolderId {
    /// Creates a new folder ID from name, timestamp and sequence
    pub fn new(name: &str, timestamp: DateTime<Utc>, sequence: u64) -> Self {
        Self {
            hash: Some(generate_hash(name, timestamp, sequence)),
        }
    }

    /// The reserved ID of the catch-all folder
    pub fn default_folder() -> Self {
        Self { hash: None }
    }

    /// Returns true if this is the reserved default folder ID
    pub fn is_default(&self) -> bool {
        self.hash.is_none()
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hash {
            Some(hash) => write!(f, "f-{}", hash),
            None => f.write_str(DEFAULT_FOLDER_ID),
        }
    }
}

impl FromStr for FolderId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == DEFAULT_FOLDER_ID {
            return Ok(Self::default_folder());
        }

        match s.strip_prefix("f-") {
            Some(hash) if is_hash(hash) => Ok(Self {
                hash: Some(hash.to_ascii_lowercase()),
            }),
            _ => Err(IdError::InvalidFolderId(s.to_string())),
        }
    }
}

impl TryFrom<String> for FolderId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FolderId> for String {
    fn from(id: FolderId) -> Self {
        id.to_string()
    }
}

/// Note ID in the format `n-{hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteId {
    hash: String,
}

impl NoteId {
    /// Creates a new note ID from title, timestamp and sequence
    pub fn new(title: &str, timestamp: DateTime<Utc>, sequence: u64) -> Self {
        Self {
            hash: generate_hash(title, timestamp, sequence),
        }
    }

    /// Returns the hash portion of the ID
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n-{}", self.hash)
    }
}

impl FromStr for NoteId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix("n-") {
            Some(hash) if is_hash(hash) => Ok(Self {
                hash: hash.to_ascii_lowercase(),
            }),
            _ => Err(IdError::InvalidNoteId(s.to_string())),
        }
    }
}

impl TryFrom<String> for NoteId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> Self {
        id.to_string()
    }
}
