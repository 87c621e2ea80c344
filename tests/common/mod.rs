//! Isolated test environment with a temporary note store root.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary note store with the standard `boxes/templates/trash`
/// layout, cleaned up on drop.
pub struct TestRoot {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl TestRoot {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let root = temp_dir.path().to_path_buf();
        for special in ["boxes", "templates", "trash"] {
            std::fs::create_dir(root.join(special)).expect("failed to create special folder");
        }
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates a note directory with an index file and returns its path.
    pub fn add_note(&self, box_name: &str, dir_name: &str, index_content: &str) -> PathBuf {
        let note_dir = self.root.join("boxes").join(box_name).join(dir_name);
        std::fs::create_dir_all(&note_dir).expect("failed to create note directory");
        std::fs::write(note_dir.join("index.txt"), index_content)
            .expect("failed to write index file");
        note_dir
    }

    /// Creates a template directory with an index file.
    pub fn add_template(&self, name: &str, index_content: &str) -> PathBuf {
        let template_dir = self.root.join("templates").join(name);
        std::fs::create_dir_all(&template_dir).expect("failed to create template directory");
        std::fs::write(template_dir.join("index.txt"), index_content)
            .expect("failed to write template index");
        template_dir
    }

    pub fn index_path(&self, box_name: &str, dir_name: &str) -> PathBuf {
        self.root
            .join("boxes")
            .join(box_name)
            .join(dir_name)
            .join("index.txt")
    }
}

impl Default for TestRoot {
    fn default() -> Self {
        Self::new()
    }
}
