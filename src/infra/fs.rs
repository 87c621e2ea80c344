//! Filesystem operations scoped to the note store: sorted listings,
//! recursive copy, rename, stat, and atomic index writes.

use crate::domain::datetime;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use walkdir::WalkDir;

/// Errors during filesystem operations on the note store.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path: path.into() },
            _ => FsError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntryInfo {
    pub name: String,
    #[serde(rename = "isDir")]
    pub is_dir: bool,
}

/// Lists entry names in a directory, sorted lexicographically.
pub fn list_dir_names_sorted(dir: &Path) -> Result<Vec<String>, FsError> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| FsError::from_io(dir, e))? {
        let entry = entry.map_err(|e| FsError::from_io(dir, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Lists directory entries with their kind, directories first, then
/// case-insensitive lexicographic by name within each group.
pub fn list_dir_entries_sorted(dir: &Path) -> Result<Vec<DirEntryInfo>, FsError> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| FsError::from_io(dir, e))? {
        let entry = entry.map_err(|e| FsError::from_io(dir, e))?;
        let meta = entry.metadata().map_err(|e| FsError::from_io(&entry.path(), e))?;
        entries.push(DirEntryInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: meta.is_dir(),
        });
    }
    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(entries)
}

/// Recursively copies a directory subtree. Used for cloning a template
/// into a new note directory; the destination must not exist yet.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<(), FsError> {
    if !src.is_dir() {
        return Err(FsError::NotADirectory { path: src.into() });
    }
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            match e.into_io_error() {
                Some(io_err) => FsError::from_io(&path, io_err),
                None => FsError::NotFound { path },
            }
        })?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir yields paths under its root");
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| FsError::from_io(&target, e))?;
        } else {
            std::fs::copy(entry.path(), &target)
                .map_err(|e| FsError::from_io(&target, e))?;
        }
    }
    Ok(())
}

/// Moves a directory or file. Atomic for same-volume moves; cross-volume
/// moves surface as a plain I/O failure.
pub fn rename(src: &Path, dst: &Path) -> Result<(), FsError> {
    std::fs::rename(src, dst).map_err(|e| FsError::from_io(src, e))
}

/// Returns a file's modification time, normalized to UTC wall-clock.
/// Any stat failure yields the zero timestamp, never an error.
pub fn stat_modified_time(path: &Path) -> DateTime<Utc> {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(|mtime| datetime::normalize_timezone(DateTime::<Local>::from(mtime)))
        .unwrap_or_else(|_| datetime::zero())
}

/// Reads a file to a string with path context on failure.
pub fn read_to_string(path: &Path) -> Result<String, FsError> {
    std::fs::read_to_string(path).map_err(|e| FsError::from_io(path, e))
}

/// Writes file content atomically via a temp file and rename, so a
/// concurrent reader never observes a partial index.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), FsError> {
    let parent = path
        .parent()
        .ok_or_else(|| FsError::NotFound { path: path.into() })?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| FsError::Io {
        path: path.into(),
        source: e,
    })?;
    temp.write_all(content.as_bytes()).map_err(|e| FsError::Io {
        path: path.into(),
        source: e,
    })?;
    temp.persist(path).map_err(|e| FsError::AtomicWrite {
        path: path.into(),
        source: e.error,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn names_sorted_lexicographically() {
        let dir = TempDir::new().unwrap();
        for name in ["zeta.txt", "alpha.txt", "Middle.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let names = list_dir_names_sorted(dir.path()).unwrap();
        assert_eq!(names, vec!["Middle.txt", "alpha.txt", "zeta.txt"]);
    }

    #[test]
    fn names_of_missing_dir_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = list_dir_names_sorted(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
    }

    #[test]
    fn entries_sorted_dirs_first_case_insensitive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::create_dir(dir.path().join("A")).unwrap();
        fs::create_dir(dir.path().join("B")).unwrap();

        let entries = list_dir_entries_sorted(dir.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "a.txt", "b.txt"]);
        assert!(entries[0].is_dir && entries[1].is_dir);
        assert!(!entries[2].is_dir && !entries[3].is_dir);
    }

    #[test]
    fn entries_of_missing_dir_is_error_not_empty() {
        let dir = TempDir::new().unwrap();
        assert!(list_dir_entries_sorted(&dir.path().join("gone")).is_err());
    }

    #[test]
    fn copy_preserves_subtree() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("template");
        fs::create_dir_all(src.join("sub/deeper")).unwrap();
        fs::write(src.join("index.txt"), "@keywords t\n\nbody").unwrap();
        fs::write(src.join("sub/deeper/file.bin"), "data").unwrap();

        let dst = dir.path().join("note");
        copy_dir_recursive(&src, &dst).unwrap();

        assert_eq!(
            fs::read_to_string(dst.join("index.txt")).unwrap(),
            "@keywords t\n\nbody"
        );
        assert_eq!(
            fs::read_to_string(dst.join("sub/deeper/file.bin")).unwrap(),
            "data"
        );
    }

    #[test]
    fn copy_of_file_source_is_rejected() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("file.txt");
        fs::write(&src, "x").unwrap();
        let err = copy_dir_recursive(&src, &dir.path().join("dst")).unwrap_err();
        assert!(matches!(err, FsError::NotADirectory { .. }));
    }

    #[test]
    fn rename_moves_directory() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("before");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("index.txt"), "x").unwrap();

        let dst = dir.path().join("after");
        rename(&src, &dst).unwrap();
        assert!(!src.exists());
        assert!(dst.join("index.txt").exists());
    }

    #[test]
    fn stat_of_missing_file_is_zero() {
        let dir = TempDir::new().unwrap();
        let t = stat_modified_time(&dir.path().join("missing"));
        assert!(datetime::is_zero(t));
    }

    #[test]
    fn stat_of_fresh_file_is_not_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "x").unwrap();
        assert!(!datetime::is_zero(stat_modified_time(&path)));
    }

    #[test]
    fn atomic_write_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.txt");
        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
