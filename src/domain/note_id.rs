//! Note identifiers of the form `box/13.01.01-14.23.36-name` or `box/name`.

use crate::domain::datetime;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// The decoded parts of a note identifier.
///
/// A note lives in exactly one box, optionally carries a creation timestamp
/// embedded in its directory name, and has a free-form name. The dated and
/// undated string encodings are mutual inverses with [`NoteId::parse`]:
///
/// ```
/// use notebox::domain::{NoteId, datetime};
///
/// let id = NoteId::parse("work/13.01.01-14.23.36-meeting");
/// assert_eq!(id.box_name, "work");
/// assert_eq!(id.name, "meeting");
/// assert_eq!(id.to_string(), "work/13.01.01-14.23.36-meeting");
///
/// let undated = NoteId::parse("work/scratchpad");
/// assert!(datetime::is_zero(undated.date));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteId {
    #[serde(rename = "box")]
    pub box_name: String,
    pub date: DateTime<Utc>,
    pub name: String,
}

impl NoteId {
    pub fn new(box_name: impl Into<String>, date: DateTime<Utc>, name: impl Into<String>) -> Self {
        Self {
            box_name: box_name.into(),
            date,
            name: name.into(),
        }
    }

    /// Builds an identifier from a box and a directory name as found on
    /// disk. Dated directory names decode their timestamp; anything else
    /// becomes an undated identifier.
    ///
    /// The dated pattern accepts any separator byte, so a hand-made
    /// directory name like `13:01:01-14:23:36-x` decodes its timestamp
    /// and re-encodes to the canonical dot form rather than the raw
    /// on-disk name. Directories written by this crate always use the
    /// dot form, where decode and re-encode are inverses.
    pub fn from_dir_name(box_name: &str, dir_name: &str) -> Self {
        Self::parse(&format!("{box_name}/{dir_name}"))
    }

    /// Decodes an identifier string. Never fails: inputs that don't match
    /// the dated pattern degrade to a box/name split with the zero date,
    /// and anything without exactly two non-empty parts yields an empty
    /// identifier.
    pub fn parse(id: &str) -> Self {
        let re = Regex::new(r"^([^/]+)/(\d\d.\d\d.\d\d-\d\d.\d\d.\d\d)-(.+)$").unwrap();
        if let Some(caps) = re.captures(id) {
            return Self::new(&caps[1], datetime::from_dir_string(&caps[2]), &caps[3]);
        }
        match id.split_once('/') {
            Some((box_name, name)) if !box_name.is_empty() && !name.is_empty() => {
                Self::new(box_name, datetime::zero(), name)
            }
            _ => Self::new("", datetime::zero(), ""),
        }
    }

    /// The note's directory name: the encoded identifier minus the box
    /// prefix.
    pub fn dir_name(&self) -> String {
        if datetime::is_zero(self.date) {
            self.name.clone()
        } else {
            format!("{}-{}", datetime::to_dir_string(self.date), self.name)
        }
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.box_name, self.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn dated_round_trip() {
        let date = Utc.with_ymd_and_hms(2013, 1, 1, 14, 23, 36).unwrap();
        let id = NoteId::new("work", date, "meeting-notes");
        assert_eq!(id.to_string(), "work/13.01.01-14.23.36-meeting-notes");
        assert_eq!(NoteId::parse(&id.to_string()), id);
    }

    #[test]
    fn undated_round_trip() {
        let id = NoteId::new("work", datetime::zero(), "scratchpad");
        assert_eq!(id.to_string(), "work/scratchpad");
        assert_eq!(NoteId::parse(&id.to_string()), id);
    }

    #[test]
    fn parse_extracts_dated_parts() {
        let id = NoteId::parse("ideas/13.03.23-00.46.57-startup");
        assert_eq!(id.box_name, "ideas");
        assert_eq!(id.name, "startup");
        assert_eq!(datetime::to_display_string(id.date), "13-03-23 @ 00:46:57");
    }

    #[test]
    fn parse_degrades_to_undated_split() {
        let id = NoteId::parse("work/not-a-dated-folder");
        assert_eq!(id.box_name, "work");
        assert_eq!(id.name, "not-a-dated-folder");
        assert!(datetime::is_zero(id.date));
    }

    #[test]
    fn parse_unsplittable_yields_empty_id() {
        for bad in ["nobox", "", "/leading", "trailing/"] {
            let id = NoteId::parse(bad);
            assert_eq!(id.box_name, "");
            assert_eq!(id.name, "");
            assert!(datetime::is_zero(id.date));
        }
    }

    #[test]
    fn name_with_slashes_keeps_first_split_only() {
        let id = NoteId::parse("box/a/b");
        assert_eq!(id.box_name, "box");
        assert_eq!(id.name, "a/b");
    }

    #[test]
    fn from_dir_name_decodes_dated_dirs() {
        let id = NoteId::from_dir_name("work", "13.01.01-14.23.36-meeting");
        assert!(!datetime::is_zero(id.date));
        assert_eq!(id.dir_name(), "13.01.01-14.23.36-meeting");
    }

    #[test]
    fn from_dir_name_canonicalizes_odd_separators() {
        let id = NoteId::from_dir_name("work", "13:01:01-14:23:36-x");
        assert_eq!(datetime::to_display_string(id.date), "13-01-01 @ 14:23:36");
        assert_eq!(id.to_string(), "work/13.01.01-14.23.36-x");
    }

    #[test]
    fn from_dir_name_keeps_plain_dirs() {
        let id = NoteId::from_dir_name("work", "plain");
        assert_eq!(id.to_string(), "work/plain");
    }
}
