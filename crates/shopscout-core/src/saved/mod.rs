//! Saved-products collection: models and the local-mirror store trait.

mod model;
mod store;

pub use model::{SaveState, SavedProduct};
pub use store::{MemorySavedMirror, SavedMirrorStore};
