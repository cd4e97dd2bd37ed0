//! Persistence backend for the wizard state: one JSON blob in one file.
//!
//! The storage contract mirrors browser local-storage semantics: a single
//! serialized snapshot under a single key, read once at startup and written
//! on every state change. Writes go through a sibling temp file and an
//! atomic rename so a crash mid-write never corrupts the snapshot.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use pitchcraft_core::{StateSnapshot, StateStore, StoreError};

#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<Option<StateSnapshot>, StoreError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(StoreError::Read(error.to_string())),
        };

        let snapshot = serde_json::from_str(&raw)
            .map_err(|error| StoreError::Read(format!("corrupt snapshot: {error}")))?;
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &StateSnapshot) -> Result<(), StoreError> {
        let raw = serde_json::to_vec_pretty(snapshot)
            .map_err(|error| StoreError::Write(error.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|error| {
                StoreError::Write(format!("could not create state directory: {error}"))
            })?;
        }

        let temp = self.temp_path();
        fs::write(&temp, &raw).await.map_err(|error| StoreError::Write(error.to_string()))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|error| StoreError::Write(error.to_string()))?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StoreError::Write(error.to_string())),
        }
    }
}
