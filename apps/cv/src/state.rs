use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::content::{ContentBundle, ContentStore, LanguagePersistence};
use crate::document::ImageResolver;
use crate::export::{ExportOrchestrator, FixedDelay, Notifier, Renderers};
use crate::i18n::{BundledLocaleSource, DirLocaleSource, LocaleSource, Resolver};
use crate::sections::AnimationLatch;
use crate::site::Site;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: ContentStore,
    pub resolver: Resolver,
    /// The live page; the orchestrator mutates it while an export runs.
    pub site: Site,
    pub orchestrator: ExportOrchestrator,
}

impl AppState {
    /// Loads content and translations, hydrates the store and renders the first page.
    ///
    /// Missing translations are not fatal: the page renders keys until they load.
    pub async fn bootstrap(config: Config, persistence: Arc<dyn LanguagePersistence>) -> Result<Self> {
        let bundle = match &config.data_dir {
            Some(dir) => ContentBundle::load_dir(dir)
                .await
                .with_context(|| format!("loading content from {}", dir.display()))?,
            None => ContentBundle::bundled().context("parsing bundled content")?,
        };
        let store = ContentStore::new(bundle, persistence);

        let source: Arc<dyn LocaleSource> = match &config.locales_dir {
            Some(dir) => Arc::new(DirLocaleSource::new(dir)),
            None => Arc::new(BundledLocaleSource),
        };
        let resolver = Resolver::new(source, !config.production);

        let (store_state, loaded) = tokio::join!(store.hydrate(), resolver.load());
        if let Err(e) = loaded {
            warn!(error = %e, "translations unavailable, rendering keys");
        }
        info!(language = %store_state.language, "content ready");

        let site = Site::new(store.clone(), resolver.clone(), Arc::new(AnimationLatch::new()));
        site.refresh();

        let images = ImageResolver::new(
            config.asset_root.clone(),
            config.public_origin.clone(),
            config.image_fetch_timeout,
        )?;
        let orchestrator = ExportOrchestrator::new(
            site.clone(),
            Arc::new(Renderers::new(images)),
            Arc::new(FixedDelay::from_config(&config)),
            Notifier::new(config.notification_duration),
        );

        Ok(Self {
            config,
            store,
            resolver,
            site,
            orchestrator,
        })
    }
}
