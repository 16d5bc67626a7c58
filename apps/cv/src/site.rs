//! The live page: the single visual tree shared by the preview server and the
//! export orchestrator.
//!
//! Re-renders build a complete new tree off to the side and swap it in whole,
//! so a language switch never leaves a mix of both languages on the page.
//! While an export holds the tree, swaps are parked and applied on release.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::content::ContentStore;
use crate::i18n::{Resolver, Translator};
use crate::sections::{render_page, AnimationRegistry, ProjectView, RenderContext, ViewNode};

#[derive(Debug, Default)]
struct LiveInner {
    tree: ViewNode,
    parked: Option<ViewNode>,
    held_for_export: bool,
    revision: u64,
}

/// Shared handle to the current page tree.
#[derive(Clone, Default)]
pub struct LiveView {
    inner: Arc<Mutex<LiveInner>>,
}

impl LiveView {
    pub fn new(tree: ViewNode) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LiveInner {
                tree,
                ..LiveInner::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LiveInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> ViewNode {
        self.lock().tree.clone()
    }

    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    /// Installs a freshly rendered tree, or parks it while an export holds the page.
    pub fn replace(&self, tree: ViewNode) {
        let mut inner = self.lock();
        if inner.held_for_export {
            debug!("export in progress, deferring page swap");
            inner.parked = Some(tree);
            return;
        }
        inner.tree = tree;
        inner.revision += 1;
    }

    /// Applies `mutate` to the live tree in place.
    pub fn mutate<R>(&self, mutate: impl FnOnce(&mut ViewNode) -> R) -> R {
        mutate(&mut self.lock().tree)
    }

    pub fn hold_for_export(&self) {
        self.lock().held_for_export = true;
    }

    /// Ends the hold and installs any tree rendered in the meantime.
    pub fn release_export(&self) {
        let mut inner = self.lock();
        inner.held_for_export = false;
        if let Some(tree) = inner.parked.take() {
            inner.tree = tree;
            inner.revision += 1;
        }
    }

    pub fn is_held(&self) -> bool {
        self.lock().held_for_export
    }
}

/// Everything needed to render the page from the current store state.
#[derive(Clone)]
pub struct Site {
    pub store: ContentStore,
    pub resolver: Resolver,
    pub animations: Arc<dyn AnimationRegistry>,
    pub live: LiveView,
}

impl Site {
    pub fn new(store: ContentStore, resolver: Resolver, animations: Arc<dyn AnimationRegistry>) -> Self {
        Self {
            store,
            resolver,
            animations,
            live: LiveView::default(),
        }
    }

    /// Renders the page for the current store snapshot without touching the live tree.
    pub fn render_tree(&self, view: &ProjectView) -> ViewNode {
        let (state, data) = self.store.current();
        let t = Translator::new(self.resolver.clone(), state.language);
        let ctx = RenderContext {
            data: &data,
            t: &t,
            animations: self.animations.as_ref(),
            projects: view,
        };
        render_page(&ctx, state)
    }

    pub fn refresh(&self) {
        self.live.replace(self.render_tree(&ProjectView::default()));
    }

    /// Re-renders whenever the language or translation status changes.
    pub fn spawn_watcher(&self) -> JoinHandle<()> {
        let site = self.clone();
        let mut store_rx = self.store.subscribe();
        let mut locale_rx = self.resolver.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = store_rx.changed() => {
                        if changed.is_err() { break; }
                        let language = store_rx.borrow_and_update().language;
                        info!(%language, "language changed, re-rendering page");
                    }
                    changed = locale_rx.changed() => {
                        if changed.is_err() { break; }
                        let status = locale_rx.borrow_and_update().clone();
                        debug!(?status, "translation status changed, re-rendering page");
                    }
                }
                site.refresh();
            }
        })
    }
}

/// Wraps a page tree in a complete HTML document.
pub fn html_document(tree: &ViewNode, title: &str, extra_head: &str) -> String {
    let lang = tree.attr_value("lang").unwrap_or("fr");
    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n{extra_head}</head>\n{}\n</html>\n",
        crate::sections::view::escape(title),
        tree.to_html()
    )
}
