//! Whole-document persistence on top of a key-value backend.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::design::Design;
use chrono::Utc;
use std::rc::Rc;

/// Key the current design is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "popup-design";

/// Load/save/clear of the current design.
///
/// Implementations never fail outward: reads fall back to a default design
/// and writes report success as a boolean.
pub trait DesignGateway {
    /// Load the stored design, or the canonical default.
    fn load(&self) -> Design;

    /// Persist `design`, stamping its `updated_at`. Returns false on failure.
    fn save(&self, design: &Design) -> bool;

    /// Remove any stored design. Returns false on failure.
    fn clear(&self) -> bool;
}

impl<G: DesignGateway + ?Sized> DesignGateway for Rc<G> {
    fn load(&self) -> Design {
        (**self).load()
    }

    fn save(&self, design: &Design) -> bool {
        (**self).save(design)
    }

    fn clear(&self) -> bool {
        (**self).clear()
    }
}

/// A [`DesignGateway`] that stores the design as JSON under a fixed key.
pub struct StorageGateway<S: KeyValueStore> {
    storage: S,
    key: String,
    fallback: Design,
}

impl<S: KeyValueStore> StorageGateway<S> {
    /// Create a gateway using [`DEFAULT_STORAGE_KEY`] and the default design.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: DEFAULT_STORAGE_KEY.to_string(),
            fallback: Design::default(),
        }
    }

    /// Use a different storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Use a different design when nothing is stored.
    pub fn with_fallback(mut self, fallback: Design) -> Self {
        self.fallback = fallback;
        self
    }

    /// The underlying storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn try_load(&self) -> StorageResult<Option<Design>> {
        let Some(json) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        let design =
            Design::from_json(&json).map_err(|e| StorageError::Serialization(e.to_string()))?;
        if !design.is_well_formed() {
            return Err(StorageError::Other(format!(
                "design '{}' has duplicate element ids or an empty canvas",
                design.id
            )));
        }
        Ok(Some(design))
    }

    fn try_save(&self, design: &Design) -> StorageResult<()> {
        let mut stamped = design.clone();
        stamped.updated_at = Some(Utc::now());
        let json = stamped
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(&self.key, &json)
    }
}

impl<S: KeyValueStore> DesignGateway for StorageGateway<S> {
    fn load(&self) -> Design {
        match self.try_load() {
            Ok(Some(design)) => {
                log::debug!("Loaded design '{}' from '{}'", design.id, self.key);
                design
            }
            Ok(None) => self.fallback.clone(),
            Err(e) => {
                log::error!("Failed to load design from '{}': {}", self.key, e);
                self.fallback.clone()
            }
        }
    }

    fn save(&self, design: &Design) -> bool {
        match self.try_save(design) {
            Ok(()) => {
                log::info!("Saved design '{}' to '{}'", design.id, self.key);
                true
            }
            Err(e) => {
                log::error!("Failed to save design to '{}': {}", self.key, e);
                false
            }
        }
    }

    fn clear(&self) -> bool {
        match self.storage.remove(&self.key) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to clear design from '{}': {}", self.key, e);
                false
            }
        }
    }
}
