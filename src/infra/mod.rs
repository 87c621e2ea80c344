//! Filesystem gateway and the index file codec.

pub mod fs;
pub mod index_format;

pub use fs::{DirEntryInfo, FsError};
