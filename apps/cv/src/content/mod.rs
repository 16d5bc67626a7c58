//! Content loading and the process-wide content store.
//!
//! Flow: bundled/overridden JSON → `raw` wire shapes → `migrate` → canonical
//! `CvData` per language → `ContentStore`, which selects one aggregate by the
//! active language.

pub mod handlers;
pub mod loader;
pub mod migrate;
pub mod raw;
pub mod store;

use thiserror::Error;

pub use loader::ContentBundle;
pub use store::{
    ContentStore, FileLanguagePersistence, LanguagePersistence, PinnedLanguage, StoreState,
};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed content document for '{language}': {source}")]
    Parse {
        language: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to persist language preference: {0}")]
    Persistence(String),
}
