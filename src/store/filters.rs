//! Saved search filters, persisted as a small JSON sidecar next to the
//! note roots (`<root>/filters.js`).

use serde_json::Value;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FiltersError {
    #[error("failed to read filters from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write filters to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("filters file {path} is not valid JSON: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Writes the filters sidecar, pretty-printed so it diffs well.
pub fn save(path: &Path, filters: &Value) -> Result<(), FiltersError> {
    let content = serde_json::to_string_pretty(filters).expect("Value serialization is infallible");
    std::fs::write(path, content).map_err(|source| FiltersError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Loads the filters sidecar.
pub fn fetch(path: &Path) -> Result<Value, FiltersError> {
    let raw = std::fs::read_to_string(path).map_err(|source| FiltersError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| FiltersError::Malformed {
        path: path.display().to_string(),
        source,
    })
}
