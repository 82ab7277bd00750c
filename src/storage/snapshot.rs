//! JSON snapshots of the in-memory store.
//!
//! A snapshot is the whole catalog: records in enumeration order plus both
//! relation tables. Files are written to a sibling temp path and renamed
//! into place so a crash never leaves a half-written snapshot behind.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ingredient::{CanonicalIngredient, IngredientId, SubstituteRelation, UnitConversion};
use crate::storage::memory::InMemoryIngredientStore;
use crate::storage::traits::StorageError;

/// Serializable copy of a whole store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Canonical records in enumeration order.
    pub ingredients: Vec<CanonicalIngredient>,
    /// Substitute relations.
    #[serde(default)]
    pub substitutes: Vec<SubstituteRelation>,
    /// Unit conversions.
    #[serde(default)]
    pub unit_conversions: Vec<UnitConversion>,
}

impl StoreSnapshot {
    /// Checks the invariants a store relies on.
    ///
    /// # Errors
    ///
    /// `BackendError` describing the first violation found.
    pub fn validate(&self) -> Result<(), StorageError> {
        let mut ids: HashSet<IngredientId> = HashSet::with_capacity(self.ingredients.len());
        let mut names: HashSet<&str> = HashSet::with_capacity(self.ingredients.len());

        for record in &self.ingredients {
            if !ids.insert(record.id) {
                return Err(invalid(format!("duplicate id {}", record.id)));
            }
            if !names.insert(record.name.as_str()) {
                return Err(invalid(format!("duplicate name {:?}", record.name)));
            }
            let mut aliases: HashSet<&str> = HashSet::with_capacity(record.aliases.len());
            for alias in &record.aliases {
                if *alias == record.name || !aliases.insert(alias.as_str()) {
                    return Err(invalid(format!(
                        "malformed alias {alias:?} on {}",
                        record.id
                    )));
                }
            }
        }

        for rel in &self.substitutes {
            for id in [rel.ingredient_id, rel.substitute_id] {
                if !ids.contains(&id) {
                    return Err(invalid(format!("substitute references missing {id}")));
                }
            }
        }
        for conv in &self.unit_conversions {
            if !ids.contains(&conv.ingredient_id) {
                return Err(invalid(format!(
                    "unit conversion references missing {}",
                    conv.ingredient_id
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> StorageError {
    StorageError::BackendError(format!("invalid snapshot: {message}"))
}

fn io_err(path: &Path, err: &std::io::Error) -> StorageError {
    StorageError::Io(format!("{}: {err}", path.display()))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl InMemoryIngredientStore {
    /// Writes the store to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// `SerializationError` or `Io` if the snapshot cannot be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let path = path.as_ref();
        let snapshot = self.snapshot()?;
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        let tmp = temp_path(path);
        fs::write(&tmp, bytes).map_err(|e| io_err(&tmp, &e))?;
        fs::rename(&tmp, path).map_err(|e| io_err(path, &e))?;
        tracing::debug!(path = %path.display(), records = snapshot.ingredients.len(), "snapshot saved");
        Ok(())
    }

    /// Loads a store from a snapshot file.
    ///
    /// # Errors
    ///
    /// `Io`, `SerializationError`, or `BackendError` for an invalid snapshot.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| io_err(path, &e))?;
        let snapshot: StoreSnapshot = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        tracing::debug!(path = %path.display(), records = snapshot.ingredients.len(), "snapshot loaded");
        Self::from_snapshot(snapshot)
    }

    /// Loads `path` if it exists, otherwise starts empty.
    ///
    /// # Errors
    ///
    /// Same as [`InMemoryIngredientStore::load_from`] for an existing file.
    pub fn open_or_default(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::new())
        }
    }
}
