//! Core types: NoteId, NoteIndex, Meta, CachedNote, and date encodings.

pub mod datetime;
mod note;
mod note_id;

pub use note::{CachedNote, Meta, NoteIndex, NoteView};
pub use note_id::NoteId;
