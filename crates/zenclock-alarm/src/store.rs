//! File-backed alarm list.
//!
//! The whole list is one JSON array, rewritten after every change. A missing
//! or unreadable file is treated as "no alarms".

use std::fs;
use std::path::{Path, PathBuf};

use zenclock_core::StorageError;

use crate::alarm::Alarm;

#[derive(Debug, Clone)]
pub struct AlarmStore {
    path: PathBuf,
}

impl AlarmStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved list. Never fails: corrupt or missing data yields an empty list.
    pub fn load(&self) -> Vec<Alarm> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No alarm file at {:?}", self.path);
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read alarm file {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Alarm>>(&json) {
            Ok(alarms) => {
                tracing::info!("Loaded {} alarms from {:?}", alarms.len(), self.path);
                alarms
            }
            Err(e) => {
                tracing::warn!("Ignoring corrupt alarm file {:?}: {}", self.path, e);
                Vec::new()
            }
        }
    }

    /// Replace the saved list with `alarms`.
    pub fn save(&self, alarms: &[Alarm]) -> Result<(), StorageError> {
        let path = self.path.display().to_string();

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::WriteFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
        }

        let json =
            serde_json::to_string(alarms).map_err(|e| StorageError::Serialize(e.to_string()))?;

        fs::write(&self.path, json).map_err(|e| StorageError::WriteFailed {
            path,
            message: e.to_string(),
        })?;

        tracing::debug!("Saved {} alarms to {:?}", alarms.len(), self.path);
        Ok(())
    }
}
