//! Path resolution for the note store layout.
//!
//! On-disk layout, preserved bit-for-bit for compatibility with existing
//! stores:
//!
//! ```text
//! <root>/
//!   boxes/<box>/<dirname>/index.txt
//!   templates/<templateName>/...
//!   trash/<dirname>/...
//!   filters.js
//! ```

use crate::domain::NoteId;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const INDEX_FILE: &str = "index.txt";
pub const FILTERS_FILE: &str = "filters.js";

/// Reserved root-level directories addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialFolder {
    Boxes,
    Templates,
    Trash,
}

impl SpecialFolder {
    pub const ALL: [SpecialFolder; 3] = [
        SpecialFolder::Boxes,
        SpecialFolder::Templates,
        SpecialFolder::Trash,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpecialFolder::Boxes => "boxes",
            SpecialFolder::Templates => "templates",
            SpecialFolder::Trash => "trash",
        }
    }
}

impl FromStr for SpecialFolder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boxes" => Ok(SpecialFolder::Boxes),
            "templates" => Ok(SpecialFolder::Templates),
            "trash" => Ok(SpecialFolder::Trash),
            other => Err(format!("unknown special folder '{other}'")),
        }
    }
}

/// The configured root directories of a note store.
#[derive(Debug, Clone)]
pub struct Roots {
    root: PathBuf,
    boxes: PathBuf,
    templates: PathBuf,
    trash: PathBuf,
}

impl Roots {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            boxes: root.join("boxes"),
            templates: root.join("templates"),
            trash: root.join("trash"),
            root,
        }
    }

    /// Checks that every root exists and is a directory. Returns the first
    /// offending path otherwise; callers treat that as a configuration
    /// error that leaves the cache disabled.
    pub fn verify(&self) -> Result<(), PathBuf> {
        for path in [&self.root, &self.boxes, &self.templates, &self.trash] {
            if !path.is_dir() {
                return Err(path.clone());
            }
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn special(&self, folder: SpecialFolder) -> &Path {
        match folder {
            SpecialFolder::Boxes => &self.boxes,
            SpecialFolder::Templates => &self.templates,
            SpecialFolder::Trash => &self.trash,
        }
    }

    /// Resolves a box-relative path (`box/dir/...`) under the boxes root.
    pub fn boxed_path(&self, relative: &str) -> PathBuf {
        self.boxes.join(relative)
    }

    /// The directory holding a note and its attachments.
    pub fn note_dir(&self, id: &NoteId) -> PathBuf {
        self.boxed_path(&id.to_string())
    }

    /// The note's index file: `<root>/boxes/<box>/<dirname>/index.txt`.
    pub fn index_path(&self, id: &NoteId) -> PathBuf {
        self.note_dir(id).join(INDEX_FILE)
    }

    /// Where a trashed note lands: its directory name under the trash
    /// root, box prefix dropped.
    pub fn trash_path(&self, id: &NoteId) -> PathBuf {
        self.trash.join(id.dir_name())
    }

    pub fn template_path(&self, template: &str) -> PathBuf {
        self.templates.join(template)
    }

    pub fn filters_path(&self) -> PathBuf {
        self.root.join(FILTERS_FILE)
    }
}
