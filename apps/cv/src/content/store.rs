//! Process-wide content store.
//!
//! Holds the active language and hands out the matching `CvData` aggregate.
//! Only the language is persisted; the aggregates are static inputs.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use crate::content::{ContentBundle, ContentError};
use crate::models::{CvData, Language};

/// Storage key the language preference is persisted under.
pub const STORAGE_KEY: &str = "cv-app-storage";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreState {
    pub language: Language,
    /// False until the persisted preference has been read back.
    pub hydrated: bool,
}

/// Where the language preference lives between runs.
#[async_trait]
pub trait LanguagePersistence: Send + Sync {
    /// `Ok(None)` means nothing was stored; callers use the default language.
    async fn load(&self) -> Result<Option<Language>, ContentError>;
    async fn save(&self, language: Language) -> Result<(), ContentError>;
}

/// JSON file persistence: `{ "cv-app-storage": { "language": "fr" } }`.
/// Other top-level keys in the file are preserved on save.
pub struct FileLanguagePersistence {
    path: PathBuf,
}

impl FileLanguagePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_document(&self) -> Result<Option<Map<String, Value>>, ContentError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ContentError::Persistence(format!(
                    "reading {}: {e}",
                    self.path.display()
                )))
            }
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(_) | Err(_) => {
                warn!(path = %self.path.display(), "ignoring unreadable language state file");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl LanguagePersistence for FileLanguagePersistence {
    async fn load(&self) -> Result<Option<Language>, ContentError> {
        let Some(document) = self.read_document().await? else {
            return Ok(None);
        };
        let stored = document
            .get(STORAGE_KEY)
            .and_then(|entry| entry.get("language"))
            .and_then(Value::as_str);
        match stored.map(str::parse::<Language>) {
            Some(Ok(language)) => Ok(Some(language)),
            Some(Err(e)) => {
                warn!(error = %e, "persisted language is invalid, using default");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn save(&self, language: Language) -> Result<(), ContentError> {
        let mut document = self.read_document().await?.unwrap_or_default();
        document.insert(
            STORAGE_KEY.to_string(),
            json!({ "language": language.code() }),
        );
        let text = serde_json::to_string_pretty(&Value::Object(document))
            .map_err(|e| ContentError::Persistence(e.to_string()))?;
        tokio::fs::write(&self.path, text).await.map_err(|e| {
            ContentError::Persistence(format!("writing {}: {e}", self.path.display()))
        })
    }
}

/// Pins the language for one-shot runs. Nothing is read from or written to disk.
pub struct PinnedLanguage(pub Language);

#[async_trait]
impl LanguagePersistence for PinnedLanguage {
    async fn load(&self) -> Result<Option<Language>, ContentError> {
        Ok(Some(self.0))
    }

    async fn save(&self, _language: Language) -> Result<(), ContentError> {
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

struct StoreInner {
    bundle: ContentBundle,
    persistence: Arc<dyn LanguagePersistence>,
    state: watch::Sender<StoreState>,
    /// Serializes swap-and-persist so saves land in the order of the swaps.
    write_lock: Mutex<()>,
}

/// Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct ContentStore {
    inner: Arc<StoreInner>,
}

impl ContentStore {
    pub fn new(bundle: ContentBundle, persistence: Arc<dyn LanguagePersistence>) -> Self {
        let (state, _) = watch::channel(StoreState {
            language: Language::default(),
            hydrated: false,
        });
        Self {
            inner: Arc::new(StoreInner {
                bundle,
                persistence,
                state,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Reads the persisted preference back and marks the store hydrated.
    /// A persistence failure is logged and leaves the default language in place.
    pub async fn hydrate(&self) -> StoreState {
        let _guard = self.inner.write_lock.lock().await;
        let stored = match self.inner.persistence.load().await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "could not read language preference");
                None
            }
        };
        self.inner.state.send_modify(|state| {
            if let Some(language) = stored {
                state.language = language;
            }
            state.hydrated = true;
        });
        let state = self.snapshot();
        info!(language = %state.language, "content store hydrated");
        state
    }

    /// Swaps the active language for every consumer at once, then persists it.
    ///
    /// The in-memory swap is kept even when persisting fails; the error is returned.
    pub async fn set_language(&self, language: Language) -> Result<StoreState, ContentError> {
        let _guard = self.inner.write_lock.lock().await;
        let changed = self.inner.state.send_if_modified(|state| {
            if state.language == language {
                return false;
            }
            state.language = language;
            true
        });
        if changed {
            info!(%language, "active language switched");
        }
        self.inner.persistence.save(language).await?;
        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> StoreState {
        *self.inner.state.borrow()
    }

    pub fn language(&self) -> Language {
        self.snapshot().language
    }

    /// The aggregate for the current language.
    pub fn cv_data(&self) -> Arc<CvData> {
        self.inner.bundle.get(self.language())
    }

    /// State and aggregate read from the same snapshot.
    pub fn current(&self) -> (StoreState, Arc<CvData>) {
        let state = self.snapshot();
        (state, self.inner.bundle.get(state.language))
    }

    pub fn cv_data_for(&self, language: Language) -> Arc<CvData> {
        self.inner.bundle.get(language)
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.inner.state.subscribe()
    }
}
