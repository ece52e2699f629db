//! Label file stored next to the vector index.
//!
//! `labels[i]` names the monument whose embedding is vector `i`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The `(city, monument)` pair an index vector was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonumentLabel {
    pub city: String,
    pub monument: String,
}

impl MonumentLabel {
    pub fn new(city: impl Into<String>, monument: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            monument: monument.into(),
        }
    }

    /// Case-insensitive identity key.
    pub fn key(&self) -> (String, String) {
        (self.city.to_lowercase(), self.monument.to_lowercase())
    }

    pub fn in_city(&self, city: &str) -> bool {
        self.city.to_lowercase() == city.to_lowercase()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed label file {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub struct LabelStorage {
    path: PathBuf,
}

impl LabelStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<MonumentLabel>, LabelError> {
        let bytes = std::fs::read(&self.path).map_err(|source| LabelError::Io {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|source| LabelError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, labels: &[MonumentLabel]) -> Result<(), LabelError> {
        let io_err = |source| LabelError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let data = serde_json::to_vec_pretty(labels).map_err(|source| LabelError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, data).map_err(io_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_err)
    }
}
