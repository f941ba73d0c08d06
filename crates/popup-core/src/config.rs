//! Editor configuration.

use crate::design::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, Design};
use crate::drag::DragConfig;
use crate::storage::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Editor configuration. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas width of the canonical default design.
    pub canvas_width: f64,
    /// Canvas height of the canonical default design.
    pub canvas_height: f64,
    /// Drag gesture tuning.
    pub drag: DragConfig,
    /// Directory for file storage (platform data dir when unset).
    pub storage_dir: Option<PathBuf>,
    /// Key the current design is stored under.
    pub storage_key: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            drag: DragConfig::default(),
            storage_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The canonical default design for this configuration.
    pub fn default_design(&self) -> Design {
        Design::with_canvas(self.canvas_width, self.canvas_height)
    }
}
