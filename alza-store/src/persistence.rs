//! File persistence helpers.
//!
//! Everything lives under one config directory (`~/.config/alza`, or
//! `$ALZA_CONFIG_DIR` when set). The directory is owner-only and secret
//! files are written atomically with mode 0600.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "ALZA_CONFIG_DIR";

/// Token file name.
pub const TOKEN_FILE: &str = "auth_token.txt";

/// Purchase defaults file name.
pub const QUICKBUY_ENV_FILE: &str = "quickbuy.env";

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the configuration directory.
pub fn config_dir() -> Result<PathBuf, StoreError> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(".config").join("alza"))
        .ok_or(StoreError::NoConfigDir)
}

/// Returns the token file path.
pub fn token_path() -> Result<PathBuf, StoreError> {
    Ok(config_dir()?.join(TOKEN_FILE))
}

/// Returns the purchase defaults file path.
pub fn quickbuy_env_path() -> Result<PathBuf, StoreError> {
    Ok(config_dir()?.join(QUICKBUY_ENV_FILE))
}

// ============================================================================
// Security: File Permissions
// ============================================================================

/// Sets restrictive file permissions (0o600) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0600", "Set restrictive permissions");
    Ok(())
}

/// Sets restrictive directory permissions (0o700) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o700);
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0700", "Set restrictive directory permissions");
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// File Operations
// ============================================================================

/// Ensures a directory exists with secure permissions.
pub async fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    if !tokio::fs::try_exists(path).await? {
        debug!(path = %path.display(), "Creating directory");
        tokio::fs::create_dir_all(path).await?;
        set_restrictive_dir_permissions(path).await?;
    }
    Ok(())
}

/// Writes a secret file atomically (temp file + rename) with mode 0600.
///
/// The parent directory is created owner-only when missing.
pub async fn write_secret_file(path: &Path, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, contents).await?;
    set_restrictive_permissions(&temp_path).await?;
    tokio::fs::rename(&temp_path, path).await?;

    debug!(path = %path.display(), bytes = contents.len(), "Secret file saved");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(TOKEN_FILE, "auth_token.txt");
        assert_eq!(QUICKBUY_ENV_FILE, "quickbuy.env");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_secret_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("alza");
        let file = dir.join("auth_token.txt");

        write_secret_file(&file, "Bearer abc").await.unwrap();

        let mode = tokio::fs::metadata(&file).await.unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "File should have 0600 permissions");
        let dir_mode = tokio::fs::metadata(&dir).await.unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700, "Directory should have 0700 permissions");
        assert_eq!(tokio::fs::read_to_string(&file).await.unwrap(), "Bearer abc");
    }

    #[tokio::test]
    async fn test_write_replaces_existing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("token");

        write_secret_file(&file, "old").await.unwrap();
        write_secret_file(&file, "new").await.unwrap();

        assert_eq!(tokio::fs::read_to_string(&file).await.unwrap(), "new");
        assert!(!temp_dir.path().join("token.tmp").exists());
    }
}
