use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

pub use self::config::PreferencesConfig;

use crate::api::models::preferences::UserPreferences;

mod config;

/// Single-document file storage for [`UserPreferences`].
///
/// Writes are serialized and replace the file atomically, so a reader
/// always sees some complete previously saved document.
#[derive(Clone)]
pub struct PreferencesStore {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    tmp_path: PathBuf,
    write_lock: Mutex<()>,
}

impl PreferencesStore {
    pub fn new(config: &PreferencesConfig) -> Self {
        let path = config.path.clone();

        let mut tmp_name = path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("preferences"));
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        Self {
            inner: Arc::new(Inner {
                path,
                tmp_path,
                write_lock: Mutex::new(()),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Returns the saved preferences, or [`UserPreferences::initial`]
    /// when nothing was saved yet.
    pub async fn load(&self) -> Result<UserPreferences, PreferencesError> {
        let path = &self.inner.path;

        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no saved preferences, using defaults");
                return Ok(UserPreferences::initial());
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to open preferences file: {e}");
                return Ok(UserPreferences::initial());
            }
        };

        serde_json::from_slice(&data).map_err(|source| PreferencesError::Corrupted {
            path: path.clone(),
            source,
        })
    }

    /// Replaces the saved preferences with `preferences`.
    pub async fn save(&self, preferences: &UserPreferences) -> Result<(), PreferencesError> {
        let data = serde_json::to_vec(preferences).map_err(PreferencesError::Encode)?;

        let _guard = self.inner.write_lock.lock().await;

        tokio::fs::write(&self.inner.tmp_path, &data)
            .await
            .map_err(|source| PreferencesError::Write {
                path: self.inner.tmp_path.clone(),
                source,
            })?;

        tokio::fs::rename(&self.inner.tmp_path, &self.inner.path)
            .await
            .map_err(|source| PreferencesError::Write {
                path: self.inner.path.clone(),
                source,
            })?;

        tracing::debug!(path = %self.inner.path.display(), "preferences saved");
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to encode preferences: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write preferences to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("preferences file {} is corrupted: {source}", path.display())]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
