//! The persisted auth token.

use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::error::StoreError;
use crate::persistence::{token_path, write_secret_file};

/// File-backed storage for the `Bearer …` token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// A store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A store backed by `auth_token.txt` in the config directory.
    pub fn at_default_path() -> Result<Self, StoreError> {
        Ok(Self::new(token_path()?))
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the token, trimmed.
    ///
    /// # Errors
    ///
    /// [`StoreError::TokenMissing`] when the file is absent or blank.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<String, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::TokenMissing(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let token = raw.trim();
        if token.is_empty() {
            return Err(StoreError::TokenMissing(self.path.clone()));
        }

        debug!(
            len = token.len(),
            bearer = token.starts_with("Bearer "),
            "Token loaded"
        );
        Ok(token.to_string())
    }

    /// Replaces the stored token.
    #[instrument(skip(self, token), fields(path = %self.path.display()))]
    pub async fn save(&self, token: &str) -> Result<(), StoreError> {
        let token = token.trim();
        write_secret_file(&self.path, token).await?;
        debug!(len = token.len(), "Token saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("auth_token.txt"));
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StoreError::TokenMissing(_)));
        assert!(err.to_string().contains("token pull"));
    }

    #[tokio::test]
    async fn test_blank_token_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth_token.txt");
        tokio::fs::write(&path, "  \n").await.unwrap();
        let err = TokenStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::TokenMissing(_)));
    }

    #[tokio::test]
    async fn test_save_then_load_trims() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join("auth_token.txt"));
        store.save("  Bearer abc.def\n").await.unwrap();
        assert_eq!(store.load().await.unwrap(), "Bearer abc.def");
    }
}
