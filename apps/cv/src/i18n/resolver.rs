//! Dotted-key translation resolver.
//!
//! Both language trees are loaded once, concurrently. Until they are in place
//! (or if loading failed) every lookup returns the key itself, so callers never
//! block and never see an error. Concurrent `load` calls share a single
//! in-flight operation; status changes are published on a `watch` channel.

use std::sync::{Arc, Mutex, RwLock};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::i18n::{LocaleSource, ResolverError};
use crate::models::Language;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

type LoadFuture = Shared<BoxFuture<'static, Result<(), ResolverError>>>;

struct Trees {
    fr: Value,
    en: Value,
}

impl Trees {
    fn get(&self, language: Language) -> &Value {
        match language {
            Language::Fr => &self.fr,
            Language::En => &self.en,
        }
    }
}

struct ResolverInner {
    source: Arc<dyn LocaleSource>,
    trees: RwLock<Option<Trees>>,
    status: watch::Sender<LoadStatus>,
    in_flight: Mutex<Option<LoadFuture>>,
    /// Log lookup misses. Off in production.
    diagnostics: bool,
}

/// Shared handle; clones see the same trees and status.
#[derive(Clone)]
pub struct Resolver {
    inner: Arc<ResolverInner>,
}

impl Resolver {
    pub fn new(source: Arc<dyn LocaleSource>, diagnostics: bool) -> Self {
        let (status, _) = watch::channel(LoadStatus::Idle);
        Self {
            inner: Arc::new(ResolverInner {
                source,
                trees: RwLock::new(None),
                status,
                in_flight: Mutex::new(None),
                diagnostics,
            }),
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.inner.status.borrow().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.status() == LoadStatus::Loaded
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadStatus> {
        self.inner.status.subscribe()
    }

    /// Loads both trees. Returns immediately once loaded; joins the in-flight
    /// load when one is running. A failed load may be retried by calling again.
    pub async fn load(&self) -> Result<(), ResolverError> {
        if self.is_loaded() {
            return Ok(());
        }
        let pending = {
            let mut slot = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match slot.as_ref() {
                Some(existing) => existing.clone(),
                None => {
                    let inner = Arc::clone(&self.inner);
                    let fut = async move { inner.run_load().await }.boxed().shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };
        pending.await
    }

    /// Resolves `key` for `language`. Falls back to the key on any miss.
    pub fn resolve(&self, key: &str, language: Language) -> String {
        let trees = self
            .inner
            .trees
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(trees) = trees.as_ref() else {
            return key.to_string();
        };

        let mut node = trees.get(language);
        for segment in key.split('.') {
            match node.get(segment) {
                Some(child) => node = child,
                None => {
                    self.report_miss(key, language, "key not found");
                    return key.to_string();
                }
            }
        }
        match node.as_str() {
            Some(text) => text.to_string(),
            None => {
                self.report_miss(key, language, "value is not a string");
                key.to_string()
            }
        }
    }

    /// Resolves `key` and replaces every `{{name}}` with its value.
    pub fn resolve_with(&self, key: &str, language: Language, params: &[(&str, &str)]) -> String {
        substitute(self.resolve(key, language), params)
    }

    fn report_miss(&self, key: &str, language: Language, reason: &str) {
        if self.inner.diagnostics {
            warn!(key, %language, reason, "translation lookup missed");
        } else {
            debug!(key, %language, reason, "translation lookup missed");
        }
    }
}

impl ResolverInner {
    async fn run_load(self: Arc<Self>) -> Result<(), ResolverError> {
        self.status.send_replace(LoadStatus::Loading);

        let result = tokio::try_join!(
            self.source.load(Language::Fr),
            self.source.load(Language::En)
        );

        let outcome = match result {
            Ok((fr, en)) => {
                *self
                    .trees
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Trees { fr, en });
                self.status.send_replace(LoadStatus::Loaded);
                info!("translations loaded");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to load translations");
                self.status.send_replace(LoadStatus::Failed(e.to_string()));
                Err(e)
            }
        };

        *self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        outcome
    }
}

/// Global find-replace of `{{name}}` placeholders.
pub fn substitute(template: String, params: &[(&str, &str)]) -> String {
    params.iter().fold(template, |text, (name, value)| {
        text.replace(&format!("{{{{{name}}}}}"), value)
    })
}
