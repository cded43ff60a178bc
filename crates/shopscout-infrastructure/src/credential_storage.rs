//! Read-only accessor for the stored session credential.
//!
//! The authentication flow (outside this engine) writes session.json; this
//! accessor only reads it. An absent or unreadable file means signed out -
//! never an error, so a broken credential file cannot crash an operation.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

use shopscout_core::credential::{Credential, CredentialStore};
use shopscout_core::error::Result;

use crate::paths::{PathError, ShopscoutPaths};

/// File-backed, read-only credential store over session.json.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store over the default session file location.
    pub fn new() -> std::result::Result<Self, PathError> {
        Ok(Self {
            path: ShopscoutPaths::session_file()?,
        })
    }

    /// Creates a store over a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<Credential>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read session file, treating as signed out");
                return Ok(None);
            }
        };

        match serde_json::from_str::<SessionFile>(&content) {
            Ok(session) if !session.token.is_empty() => Ok(Some(Credential {
                token: session.token,
                user_id: session.user_id,
            })),
            Ok(_) => Ok(None),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Malformed session file, treating as signed out");
                Ok(None)
            }
        }
    }
}

/// On-disk shape of session.json, owned by the auth flow.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    token: String,
    #[serde(default)]
    user_id: String,
}
