//! Core note data model: parsed index content, cached records, and the
//! normalized snapshots handed to callers.

use crate::domain::{NoteId, datetime};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Insertion-ordered string-to-string metadata map.
///
/// The index file format serializes meta entries in the order they first
/// appeared, so a plain sorted map won't do. Meta sections are tiny (a
/// handful of keys), so linear lookup is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    entries: Vec<(String, String)>,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets a key, replacing any existing value and keeping its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Appends to an existing value, or inserts the key if absent.
    /// Repeated `@key` lines in an index file accumulate this way.
    pub fn append(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => v.push_str(value),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn keywords(&self) -> &str {
        self.get("keywords").unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for Meta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Meta {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Meta::new();
        for (k, v) in iter {
            meta.set(k, v);
        }
        meta
    }
}

/// The parsed content of one note's index file: free text plus metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteIndex {
    pub text: String,
    pub meta: Meta,
}

impl NoteIndex {
    pub fn new(text: impl Into<String>, meta: Meta) -> Self {
        Self {
            text: text.into(),
            meta,
        }
    }
}

/// The cache's materialized view of a note: identity, index content, and
/// the index file's last-modified timestamp.
///
/// Owned exclusively by the cache; callers only ever see [`NoteView`]
/// snapshots.
#[derive(Debug, Clone)]
pub struct CachedNote {
    pub id: NoteId,
    pub mdate: DateTime<Utc>,
    pub text: String,
    pub meta: Meta,
}

impl CachedNote {
    pub fn new(id: NoteId) -> Self {
        Self {
            id,
            mdate: datetime::zero(),
            text: String::new(),
            meta: Meta::new(),
        }
    }

    /// Produces the normalized snapshot: dates rendered through the display
    /// format and `keywords` always present.
    pub fn to_view(&self) -> NoteView {
        let mut meta = self.meta.clone();
        if meta.get("keywords").is_none() {
            meta.set("keywords", "");
        }
        NoteView {
            box_name: self.id.box_name.clone(),
            date: datetime::to_display_string(self.id.date),
            name: self.id.name.clone(),
            mdate: datetime::to_display_string(self.mdate),
            text: self.text.clone(),
            meta,
            file_count: 0,
        }
    }
}

/// A normalized, caller-facing copy of a cached note.
///
/// `date` and `mdate` are display strings, never raw timestamps, and
/// `meta` always carries a `keywords` entry. `file_count` is only
/// populated by [`crate::store::NoteStore::note_index`]; listings leave
/// it at zero.
#[derive(Debug, Clone, Serialize)]
pub struct NoteView {
    #[serde(rename = "box")]
    pub box_name: String,
    pub date: String,
    pub name: String,
    pub mdate: String,
    pub text: String,
    pub meta: Meta,
    #[serde(rename = "fileCount")]
    pub file_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn meta_preserves_insertion_order() {
        let mut meta = Meta::new();
        meta.set("zulu", "1");
        meta.set("alpha", "2");
        meta.set("mike", "3");
        let keys: Vec<&str> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn meta_set_replaces_in_place() {
        let mut meta = Meta::new();
        meta.set("a", "1");
        meta.set("b", "2");
        meta.set("a", "3");
        assert_eq!(meta.get("a"), Some("3"));
        let keys: Vec<&str> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn meta_append_concatenates() {
        let mut meta = Meta::new();
        meta.append("k", "abc");
        meta.append("k", "def");
        assert_eq!(meta.get("k"), Some("abcdef"));
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn meta_serializes_as_ordered_map() {
        let meta: Meta = [("keywords", "a, b"), ("author", "me")].into_iter().collect();
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"keywords":"a, b","author":"me"}"#);
    }

    #[test]
    fn view_normalizes_dates_and_keywords() {
        let date = chrono::Utc.with_ymd_and_hms(2013, 1, 1, 14, 23, 36).unwrap();
        let mut note = CachedNote::new(NoteId::new("work", date, "meeting"));
        note.text = "hello".into();

        let view = note.to_view();
        assert_eq!(view.date, "13-01-01 @ 14:23:36");
        assert_eq!(view.mdate, "00-01-01 @ 00:00:00");
        assert_eq!(view.meta.get("keywords"), Some(""));
        assert_eq!(view.file_count, 0);
    }

    #[test]
    fn view_keeps_existing_keywords() {
        let mut note = CachedNote::new(NoteId::parse("work/scratch"));
        note.meta.set("keywords", "alpha, beta");
        assert_eq!(note.to_view().meta.get("keywords"), Some("alpha, beta"));
    }
}
