//! Unified path management for ShopScout local storage.
//!
//! All engine-local files (credential, secrets, cache, mirror) resolve
//! through `ShopscoutPaths` so every storage component agrees on locations.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for ShopScout.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/shopscout/         # Config directory
/// ├── secret.json              # Provider API keys (static configuration)
/// └── session.json             # Session credential, written by the auth flow
///
/// ~/.local/share/shopscout/    # Data directory
/// ├── cache/                   # Detail cache (1 item = 1 file)
/// └── store/                   # Saved-products local mirror
/// ```
pub struct ShopscoutPaths;

impl ShopscoutPaths {
    /// Returns the shopscout configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("shopscout"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the shopscout data directory (for larger files).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join("shopscout"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path to the session credential file.
    ///
    /// The authentication flow is the only writer; the engine reads it via
    /// `FileCredentialStore`.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.json"))
    }

    /// Returns the detail-cache directory.
    pub fn cache_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("cache"))
    }

    /// Returns the directory holding the saved-products mirror.
    pub fn store_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("store"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = ShopscoutPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("shopscout"));
    }

    #[test]
    fn test_secret_file() {
        let secret_file = ShopscoutPaths::secret_file().unwrap();
        assert!(secret_file.ends_with("secret.json"));
        let config_dir = ShopscoutPaths::config_dir().unwrap();
        assert!(secret_file.starts_with(&config_dir));
    }

    #[test]
    fn test_session_file() {
        let session_file = ShopscoutPaths::session_file().unwrap();
        assert!(session_file.ends_with("session.json"));
    }

    #[test]
    fn test_cache_and_store_dirs_are_under_data_dir() {
        let data_dir = ShopscoutPaths::data_dir().unwrap();
        assert!(ShopscoutPaths::cache_dir().unwrap().starts_with(&data_dir));
        assert!(ShopscoutPaths::store_dir().unwrap().starts_with(&data_dir));
    }
}
