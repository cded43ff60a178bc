//! Flat string-keyed JSON storage, one key = one file.
//!
//! Backs the detail cache and the saved-products mirror. Keys are namespaced
//! by directory so cache entries never collide with unrelated persisted keys.
//!
//! Provides:
//! - **Atomicity**: writes go to a tmp file, fsync, then atomic rename
//! - **Isolation**: an advisory lock file serializes writers per directory
//! - **Durability**: explicit fsync before rename

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use shopscout_core::ShopscoutError;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON encode/decode error.
    JsonError(serde_json::Error),
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(e) => write!(f, "I/O error: {}", e),
            StorageError::JsonError(e) => write!(f, "JSON error: {}", e),
            StorageError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::IoError(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::JsonError(e)
    }
}

impl From<StorageError> for ShopscoutError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::IoError(io) => ShopscoutError::io(io.to_string()),
            StorageError::JsonError(json) => ShopscoutError::Serialization {
                format: "JSON".to_string(),
                message: json.to_string(),
            },
            StorageError::LockError(message) => ShopscoutError::storage(message),
        }
    }
}

/// A directory of JSON documents, one key = one file.
pub struct JsonDirStorage {
    base_dir: PathBuf,
}

impl JsonDirStorage {
    /// Opens (creating if needed) a storage directory.
    pub async fn new(base_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_dir = base_dir.into();
        tokio::fs::create_dir_all(&base_dir).await?;
        Ok(Self { base_dir })
    }

    /// Loads the document stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and decoded
    /// - `Ok(None)`: No document for `key`
    /// - `Err`: Failed to read or decode the file
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.file_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&path).await?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Saves a document under `key` atomically.
    pub async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let _lock = self.acquire_lock()?;

        let json = serde_json::to_string_pretty(value)?;
        let path = self.file_path(key);
        let tmp_path = self.temp_path(key);

        let mut tmp_file = tokio::fs::File::create(&tmp_path).await?;
        tmp_file.write_all(json.as_bytes()).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        tokio::fs::rename(&tmp_path, &path).await?;

        Ok(())
    }

    /// Deletes the document under `key`; missing documents are not an error.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let _lock = self.acquire_lock()?;

        let path = self.file_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes every document in this storage directory.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let _lock = self.acquire_lock()?;

        let mut entries = tokio::fs::read_dir(&self.base_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                tokio::fs::remove_file(&path).await?;
            }
        }
        Ok(())
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize_key(key)))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!(".{}.json.tmp", sanitize_key(key)))
    }

    fn acquire_lock(&self) -> Result<FileLock, StorageError> {
        FileLock::acquire(&self.base_dir)
    }
}

/// Keeps keys filesystem-safe: provider item ids can contain arbitrary
/// characters, file names cannot.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// A file lock guard that automatically releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: std::fs::File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(dir: &Path) -> Result<Self, StorageError> {
        let lock_path = dir.join(".storage.lock");

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| StorageError::LockError(format!("Failed to acquire lock: {}", e)))?;
        }

        #[cfg(not(unix))]
        {
            // No advisory locking outside Unix; acceptable for a single-user
            // client where the surrounding UI serializes actions.
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped
        let _ = std::fs::remove_file(&self.lock_path);
    }
}
