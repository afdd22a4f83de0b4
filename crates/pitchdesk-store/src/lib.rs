//! JSON-file persistence for rightsholder profiles and generation history.
//!
//! Each collection is a single JSON array on disk, read when opened and
//! rewritten in full after every mutation.

mod history;
mod profiles;

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use history::HistoryLog;
pub use profiles::ProfileRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("profile not found: {0}")]
    NotFound(String),
}

/// Read a JSON array from `path`, returning `None` when the file does not exist.
fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>, StoreError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    if raw.trim().is_empty() {
        return Ok(Some(Vec::new()));
    }

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StoreError::Json {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Write `items` to `path` via a sibling temp file and rename.
fn write_json_array<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let body = serde_json::to_vec_pretty(items).map_err(|e| StoreError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, body).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}
