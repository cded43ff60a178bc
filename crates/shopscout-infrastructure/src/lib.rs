pub mod credential_storage;
pub mod detail_cache;
pub mod paths;
pub mod saved_mirror;
pub mod storage;

pub use crate::credential_storage::FileCredentialStore;
pub use crate::detail_cache::FileDetailCache;
pub use crate::saved_mirror::FileSavedMirror;
pub use crate::storage::SecretStorage;
