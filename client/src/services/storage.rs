//! Local key-value store backed by a single JSON file
//!
//! Read-modify-write cycles are serialized behind a mutex and every
//! write replaces the file atomically (temp file + rename).

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};

/// JSON file key-value store
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a value; `None` if the key or the file does not exist
    pub async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        Ok(entries.remove(key))
    }

    pub async fn set(&self, key: &str, value: Value) -> AppResult<()> {
        self.update(key, |_| Ok((Some(value), ()))).await
    }

    pub async fn remove(&self, key: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }

    /// Atomically transform the value under `key`.
    ///
    /// `f` receives the current value and returns the new one (or `None`
    /// to leave the store untouched) plus a result handed back to the
    /// caller.
    pub async fn update<T, F>(&self, key: &str, f: F) -> AppResult<T>
    where
        F: FnOnce(Option<Value>) -> AppResult<(Option<Value>, T)>,
    {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;

        let (next, output) = f(entries.get(key).cloned())?;
        if let Some(value) = next {
            entries.insert(key.to_string(), value);
            self.write_all(&entries).await?;
        }

        Ok(output)
    }

    async fn read_all(&self) -> AppResult<Map<String, Value>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(AppError::StorageError(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(AppError::StorageError(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(AppError::StorageError(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write_all(&self, entries: &Map<String, Value>) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::StorageError(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let body = serde_json::to_vec_pretty(entries)
            .map_err(|e| AppError::StorageError(format!("Failed to serialize store: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await.map_err(|e| {
            AppError::StorageError(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::StorageError(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        tracing::debug!("Wrote {} key(s) to {}", entries.len(), self.path.display());
        Ok(())
    }
}
