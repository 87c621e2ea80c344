//! In-memory mirror of the on-disk note store.
//!
//! The cache owns two pieces of state that are always updated as one unit
//! under a single write lock: the note map and the per-box keyword index.
//! Readers get cloned snapshots and can never observe a half-rebuilt
//! cache. There are no intermediate states per entry: a note is either
//! absent or cached.

use crate::domain::{CachedNote, NoteId, NoteIndex, NoteView};
use crate::infra::fs;
use crate::infra::index_format;
use crate::store::paths::{Roots, SpecialFolder};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Cache-integrity failures, distinct from I/O errors: the caller should
/// be told to rebuild the cache rather than retry the operation.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("note '{id}' not found in cache; try rebuilding the cache")]
    NotCached { id: String },
}

#[derive(Default)]
struct CacheInner {
    notes: BTreeMap<String, CachedNote>,
    keywords: BTreeMap<String, Vec<String>>,
}

/// Mapping from note identifier to cached note record, plus the derived
/// keyword index.
pub struct NoteCache {
    roots: Roots,
    inner: RwLock<CacheInner>,
}

impl NoteCache {
    /// Creates an empty cache over the given roots. Call [`rebuild`] to
    /// populate it.
    ///
    /// [`rebuild`]: NoteCache::rebuild
    pub fn new(roots: Roots) -> Self {
        Self {
            roots,
            inner: RwLock::new(CacheInner::default()),
        }
    }

    /// Discards all entries and re-enumerates every note directory under
    /// every box. The only path that discovers notes written to disk
    /// outside the store's own operations. Idempotent and safe to call at
    /// any time; per-entry stat failures are logged and skipped, never
    /// fatal.
    pub fn rebuild(&self) {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        inner.notes.clear();
        inner.keywords.clear();

        let boxes = match fs::list_dir_entries_sorted(self.roots.special(SpecialFolder::Boxes)) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("cannot list boxes: {err}");
                return;
            }
        };

        for box_entry in boxes.iter().filter(|e| e.is_dir) {
            let box_path = self.roots.boxed_path(&box_entry.name);
            let note_dirs = match fs::list_dir_names_sorted(&box_path) {
                Ok(names) => names,
                Err(err) => {
                    warn!("cannot list box '{}': {err}", box_entry.name);
                    continue;
                }
            };

            for dir_name in note_dirs {
                match std::fs::metadata(box_path.join(&dir_name)) {
                    Ok(meta) if meta.is_dir() => {}
                    Ok(_) => continue,
                    Err(err) => {
                        warn!("stat failed for '{}/{dir_name}': {err}", box_entry.name);
                        continue;
                    }
                }
                let id = NoteId::from_dir_name(&box_entry.name, &dir_name);
                inner.notes.insert(id.to_string(), self.load(&id));
            }
        }

        inner.keywords = recompute_keywords(&inner.notes);

        info!(
            notes = inner.notes.len(),
            boxes = inner.keywords.len(),
            "cache rebuilt"
        );
    }

    /// Loads a single note fresh from disk into the cache, overwriting any
    /// existing entry, and returns its normalized snapshot. Used after
    /// creating a note from a template or after a move completes.
    pub fn cache_note(&self, id: &NoteId) -> NoteView {
        let note = self.load(id);
        let view = note.to_view();
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        inner.notes.insert(id.to_string(), note);
        inner.keywords = recompute_keywords(&inner.notes);
        view
    }

    /// Replaces a cached note's text and meta, refreshing its modification
    /// date from disk. The note must already be cached.
    pub fn update_index(&self, id: &NoteId, index: &NoteIndex) -> Result<NoteView, CacheError> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let key = id.to_string();
        let Some(note) = inner.notes.get_mut(&key) else {
            return Err(CacheError::NotCached { id: key });
        };
        note.text = index.text.clone();
        note.meta = index.meta.clone();
        note.mdate = fs::stat_modified_time(&self.roots.index_path(id));
        let view = note.to_view();
        inner.keywords = recompute_keywords(&inner.notes);
        Ok(view)
    }

    /// Removes a note from the cache. Removing an absent entry is a no-op.
    pub fn uncache(&self, id: &NoteId) {
        self.inner.write().notes.remove(&id.to_string());
    }

    /// Returns a normalized snapshot of one note, including its full text.
    pub fn get(&self, id: &NoteId) -> Option<NoteView> {
        self.inner
            .read()
            .notes
            .get(&id.to_string())
            .map(CachedNote::to_view)
    }

    /// Returns snapshots of all notes with `text` cleared; listings never
    /// need full text, and leaving it out keeps responses small.
    pub fn list(&self) -> BTreeMap<String, NoteView> {
        self.inner
            .read()
            .notes
            .iter()
            .map(|(id, note)| {
                let mut view = note.to_view();
                view.text.clear();
                (id.clone(), view)
            })
            .collect()
    }

    /// The full keyword index: box name to sorted, de-duplicated keywords.
    pub fn keywords(&self) -> BTreeMap<String, Vec<String>> {
        self.inner.read().keywords.clone()
    }

    /// Keywords for a single box; empty when the box has none.
    pub fn box_keywords(&self, box_name: &str) -> Vec<String> {
        self.inner
            .read()
            .keywords
            .get(box_name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().notes.is_empty()
    }

    /// Reads one note's identity, index content, and modification time
    /// from disk. Read or parse failures leave text and meta empty; the
    /// mdate falls back to the zero timestamp on stat failure.
    fn load(&self, id: &NoteId) -> CachedNote {
        let index_path = self.roots.index_path(id);
        let mut note = CachedNote::new(id.clone());
        note.mdate = fs::stat_modified_time(&index_path);
        match fs::read_to_string(&index_path) {
            Ok(raw) => {
                let index = index_format::parse(&raw);
                note.text = index.text;
                note.meta = index.meta;
            }
            Err(err) => {
                debug!("index read failed for '{id}': {err}");
            }
        }
        note
    }
}

/// Rebuilds the per-box keyword index from every cached note's `keywords`
/// meta field: comma-separated tokens, trimmed, empties dropped,
/// de-duplicated and sorted per box.
///
/// Runs from scratch on every mutating cache call. Incremental
/// maintenance would save nothing measurable at personal-scale note
/// counts, so the simple full recomputation stays.
fn recompute_keywords(notes: &BTreeMap<String, CachedNote>) -> BTreeMap<String, Vec<String>> {
    let mut sets: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for note in notes.values() {
        let box_keywords = sets.entry(&note.id.box_name).or_default();
        for keyword in note.meta.keywords().split(',') {
            let keyword = keyword.trim();
            if !keyword.is_empty() {
                box_keywords.insert(keyword);
            }
        }
    }
    sets.into_iter()
        .map(|(box_name, set)| {
            (
                box_name.to_string(),
                set.into_iter().map(str::to_string).collect(),
            )
        })
        .collect()
}
