//! Domain models for the notes store
//!
//! Contains the data types and pure helpers without any state or I/O.

mod clock;
mod date;
mod folder;
mod id;
mod note;

pub use clock::{Clock, ManualClock, SystemClock};
pub use date::{format_date, TimeDisplay};
pub use folder::{Folder, DEFAULT_FOLDER_NAME};
pub use id::{FolderId, IdError, NoteId, DEFAULT_FOLDER_ID};
pub use note::Note;
