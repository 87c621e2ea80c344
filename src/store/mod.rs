//! The note store: the single owned handle combining path resolution,
//! the in-memory cache, and the mutating filesystem operations request
//! handlers call into.

pub mod cache;
pub mod filters;
pub mod paths;

pub use cache::{CacheError, NoteCache};
pub use paths::{Roots, SpecialFolder};

use crate::domain::{NoteId, NoteIndex, NoteView, datetime};
use crate::infra::fs::{self, DirEntryInfo, FsError};
use crate::infra::index_format;
use chrono::Local;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::info;

/// Errors surfaced by store operations. Conflict, cache-integrity, and
/// I/O failures are deliberately distinct variants: the first blocks a
/// write, the second means "rebuild your cache", and only the third is a
/// plain filesystem problem.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid note store root: '{path}' is missing or not a directory")]
    InvalidRoot { path: PathBuf },

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("note '{id}' was modified externally; copy your changes and rebuild the cache")]
    Conflict { id: String },

    #[error("note '{id}' not found; try rebuilding the cache")]
    NoteNotFound { id: String },

    #[error("invalid date or time format: '{given}'")]
    InvalidDate { given: String },

    #[error("source and destination directory names are the same: {path}")]
    SamePath { path: PathBuf },

    #[error("invalid path: '{uri}'")]
    InvalidPath { uri: String },

    #[error("failed to launch opener for {path}: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Filters(#[from] filters::FiltersError),
}

/// A resolvable location inside the store: either one of the reserved
/// root folders, or a box-relative path like `work/13.01.01-14.23.36-x`.
#[derive(Debug, Clone)]
pub enum PathTarget {
    Special(SpecialFolder),
    Boxed(String),
}

impl PathTarget {
    fn resolve(&self, roots: &Roots) -> Result<PathBuf, StoreError> {
        match self {
            PathTarget::Special(folder) => Ok(roots.special(*folder).to_path_buf()),
            PathTarget::Boxed(uri) if !uri.is_empty() => Ok(roots.boxed_path(uri)),
            PathTarget::Boxed(uri) => Err(StoreError::InvalidPath { uri: uri.clone() }),
        }
    }
}

/// The fields of a note's new identity for a move/rename: a box, a date
/// in display format (`13-03-23 @ 00:46:57`), and a name.
#[derive(Debug, Clone)]
pub struct MoveRequest {
    pub box_name: String,
    pub date: String,
    pub name: String,
}

/// Filesystem-backed note store with an in-memory cache.
///
/// One instance owns all process-wide note state; handlers receive it by
/// reference. Reads return snapshots; mutations go through the cache's
/// single writer lock.
pub struct NoteStore {
    roots: Roots,
    cache: NoteCache,
}

impl NoteStore {
    /// Opens the store rooted at `root` and performs the initial cache
    /// build. Fails with [`StoreError::InvalidRoot`] when any of the
    /// required directories (`boxes`, `templates`, `trash`) is missing;
    /// nothing is cached in that case.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let roots = Roots::new(root);
        roots
            .verify()
            .map_err(|path| StoreError::InvalidRoot { path })?;
        let store = Self {
            cache: NoteCache::new(roots.clone()),
            roots,
        };
        store.cache.rebuild();
        Ok(store)
    }

    pub fn roots(&self) -> &Roots {
        &self.roots
    }

    /// Discards and rebuilds the whole cache from disk.
    pub fn rebuild(&self) {
        self.cache.rebuild();
    }

    pub fn note_count(&self) -> usize {
        self.cache.len()
    }

    /// Box names: the directories directly under the boxes root, sorted.
    pub fn box_names(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::list_dir_entries_sorted(self.roots.special(SpecialFolder::Boxes))?;
        Ok(entries
            .into_iter()
            .filter(|e| e.is_dir)
            .map(|e| e.name)
            .collect())
    }

    pub fn template_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(fs::list_dir_names_sorted(
            self.roots.special(SpecialFolder::Templates),
        )?)
    }

    pub fn special_names(&self) -> Vec<&'static str> {
        SpecialFolder::ALL.iter().map(|s| s.name()).collect()
    }

    /// Snapshot of all cached notes, texts cleared.
    pub fn all_notes(&self) -> BTreeMap<String, NoteView> {
        self.cache.list()
    }

    /// Snapshot of the per-box keyword index.
    pub fn all_keywords(&self) -> BTreeMap<String, Vec<String>> {
        self.cache.keywords()
    }

    pub fn box_keywords(&self, box_name: &str) -> Vec<String> {
        self.cache.box_keywords(box_name)
    }

    /// Directory listing for attachment browsing inside a note directory
    /// or a special folder.
    pub fn subdir_listing(&self, target: &PathTarget) -> Result<Vec<DirEntryInfo>, StoreError> {
        let path = target.resolve(&self.roots)?;
        Ok(fs::list_dir_entries_sorted(&path)?)
    }

    /// One note's normalized snapshot including full text, plus a
    /// best-effort count of files in its directory (0 on failure).
    pub fn note_index(&self, id: &NoteId) -> Result<NoteView, StoreError> {
        let mut view = self
            .cache
            .get(id)
            .ok_or_else(|| StoreError::NoteNotFound { id: id.to_string() })?;
        view.file_count = fs::list_dir_names_sorted(&self.roots.note_dir(id))
            .map(|names| names.len())
            .unwrap_or(0);
        Ok(view)
    }

    /// Saves a changed note index to disk and updates the cache.
    ///
    /// Before writing, the on-disk index file's modification time is
    /// checked against the cached `mdate`; a mismatch means an external
    /// writer touched the file and the save is rejected with
    /// [`StoreError::Conflict`] instead of silently overwriting.
    pub fn save_note_index(&self, id: &NoteId, index: &NoteIndex) -> Result<NoteView, StoreError> {
        let index_path = self.roots.index_path(id);

        if let Some(cached) = self.cache.get(id) {
            if index_path.exists() {
                let on_disk = datetime::to_display_string(fs::stat_modified_time(&index_path));
                if on_disk != cached.mdate {
                    return Err(StoreError::Conflict { id: id.to_string() });
                }
            }
        }

        fs::write_atomic(&index_path, &index_format::serialize(index))?;
        Ok(self.cache.update_index(id, index)?)
    }

    /// Moves the note's directory under the trash root, keeping the
    /// directory name, and drops it from the cache.
    pub fn trash_note(&self, id: &NoteId) -> Result<(), StoreError> {
        let src = self.roots.note_dir(id);
        let dst = self.roots.trash_path(id);
        info!("trash '{id}': {} -> {}", src.display(), dst.display());
        fs::rename(&src, &dst)?;
        self.cache.uncache(id);
        Ok(())
    }

    /// Renames or re-dates a note. The new date must parse to a
    /// non-sentinel value, and source and destination must differ; on
    /// rejection both the cache and the filesystem are left untouched.
    pub fn move_note(
        &self,
        id: &NoteId,
        request: &MoveRequest,
    ) -> Result<(NoteId, NoteView), StoreError> {
        let date = datetime::from_display_string(&request.date);
        if datetime::is_zero(date) {
            return Err(StoreError::InvalidDate {
                given: request.date.clone(),
            });
        }

        let dst_id = NoteId::new(&request.box_name, date, &request.name);
        let src = self.roots.note_dir(id);
        let dst = self.roots.note_dir(&dst_id);
        if src == dst {
            return Err(StoreError::SamePath { path: dst });
        }

        info!("move '{id}' -> '{dst_id}'");
        fs::rename(&src, &dst)?;
        self.cache.uncache(id);
        let view = self.cache.cache_note(&dst_id);
        Ok((dst_id, view))
    }

    /// Clones a template directory into a freshly timestamped note in the
    /// given box and caches it.
    pub fn clone_template(
        &self,
        template: &str,
        box_name: &str,
    ) -> Result<(NoteId, NoteView), StoreError> {
        let date = datetime::normalize_timezone(Local::now());
        let id = NoteId::new(box_name, date, template);
        let src = self.roots.template_path(template);
        let dst = self.roots.note_dir(&id);

        info!("clone template '{template}' -> '{id}'");
        fs::copy_dir_recursive(&src, &dst)?;
        let view = self.cache.cache_note(&id);
        Ok((id, view))
    }

    /// Resolves a location and hands it to the platform opener. Returns
    /// the resolved path for reporting.
    pub fn launch(&self, target: &PathTarget) -> Result<PathBuf, StoreError> {
        let path = target.resolve(&self.roots)?;
        if !path.exists() {
            return Err(StoreError::InvalidPath {
                uri: path.display().to_string(),
            });
        }
        opener_command(&path)
            .spawn()
            .map_err(|source| StoreError::Launch {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// Persists the saved-search filters sidecar.
    pub fn save_filters(&self, filters: &serde_json::Value) -> Result<(), StoreError> {
        Ok(filters::save(&self.roots.filters_path(), filters)?)
    }

    /// Loads the saved-search filters sidecar.
    pub fn fetch_filters(&self) -> Result<serde_json::Value, StoreError> {
        Ok(filters::fetch(&self.roots.filters_path())?)
    }
}

#[cfg(target_os = "macos")]
fn opener_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(target_os = "windows")]
fn opener_command(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}
