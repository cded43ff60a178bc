//! Session credential model and the read-only accessor trait.
//!
//! The (excluded) authentication flow is the only writer of the stored
//! credential; the engine only ever reads it.

use async_trait::async_trait;

use crate::error::Result;

/// A previously issued session credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Bearer token supplied on every account-backend request.
    pub token: String,
    /// User identifier issued alongside the token.
    pub user_id: String,
}

/// Read-only access to the stored session credential.
///
/// `Ok(None)` means signed out; remote-account operations must short-circuit
/// without a network call in that case.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> Result<Option<Credential>>;
}

/// Fixed-credential store for tests and wiring.
pub struct StaticCredentialStore {
    credential: Option<Credential>,
}

impl StaticCredentialStore {
    /// A store that always returns the given credential.
    pub fn signed_in(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            credential: Some(Credential {
                token: token.into(),
                user_id: user_id.into(),
            }),
        }
    }

    /// A store that always reports signed out.
    pub fn signed_out() -> Self {
        Self { credential: None }
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn load(&self) -> Result<Option<Credential>> {
        Ok(self.credential.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_store_states() {
        let store = StaticCredentialStore::signed_in("tok", "user-1");
        let credential = store.load().await.unwrap().unwrap();
        assert_eq!(credential.token, "tok");
        assert_eq!(credential.user_id, "user-1");

        let store = StaticCredentialStore::signed_out();
        assert!(store.load().await.unwrap().is_none());
    }
}
