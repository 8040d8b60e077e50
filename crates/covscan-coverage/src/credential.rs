//! Durable storage for the scraping backend API key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::CredentialError;

/// A single API key stored as a file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CredentialError {
        CredentialError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the stored key. `None` when nothing (or only whitespace) is stored.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Io`] on any read failure other than a missing file.
    pub async fn get(&self) -> Result<Option<String>, CredentialError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let key = raw.trim();
                Ok((!key.is_empty()).then(|| key.to_owned()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Persist `key`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Empty`] for a blank key and
    /// [`CredentialError::Io`] if the file cannot be written.
    pub async fn save(&self, key: &str) -> Result<(), CredentialError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::Empty);
        }
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        tokio::fs::write(&self.path, key)
            .await
            .map_err(|e| self.io_error(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|e| self.io_error(e))?;
        }

        tracing::info!(path = %self.path.display(), "saved scraping API key");
        Ok(())
    }

    /// Remove the stored key. Clearing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Io`] if the file exists but cannot be removed.
    pub async fn clear(&self) -> Result<(), CredentialError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "cleared scraping API key");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
