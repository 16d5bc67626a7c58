//! Export orchestration.
//!
//! Lifecycle: `Idle → Preparing → Capturing → Restoring → Idle`.
//!
//! A trigger is accepted only from `Idle`; anything else is refused with
//! [`ExportError::Busy`] and leaves the running export untouched. Once
//! accepted, the run is spawned onto its own task so it completes even if
//! the caller goes away. Restoring runs on every exit path: the journal
//! recorded while preparing is reverted whether the capture succeeded,
//! failed, or panicked.

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info};

use crate::document::{render_pdf, ImageResolver};
use crate::export::export_mode::enter_export_mode;
use crate::export::{
    current_year, export_filename, ExportArtifact, ExportError, ExportStrategy, Notifier,
    SettleSignal,
};
use crate::i18n::Translator;
use crate::models::CvData;
use crate::sections::boundary::panic_message;
use crate::sections::ViewNode;
use crate::site::{html_document, Site};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportPhase {
    Idle,
    Preparing,
    Capturing,
    Restoring,
}

/// Output of a capture strategy, before it is named.
#[derive(Debug, Clone)]
pub struct Captured {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub extension: &'static str,
}

/// Produces the exported bytes from the page in export mode.
#[async_trait]
pub trait Capture: Send + Sync {
    async fn capture(
        &self,
        strategy: ExportStrategy,
        page: &ViewNode,
        cv: &CvData,
        t: &Translator,
    ) -> Result<Captured, ExportError>;
}

const PRINT_HEAD: &str = r#"<style>
@page { size: A4; margin: 10mm; }
body.generating-pdf .web-only { display: none !important; }
body.generating-pdf .expanded-content { display: block !important; }
body.generating-pdf .animate-enter { opacity: 1 !important; transform: none !important; }
.cv-section { break-inside: avoid-page; }
</style>
<script>window.addEventListener("load", function () { window.print(); });</script>
"#;

/// The built-in strategies: the print page and the paginated document.
#[derive(Clone)]
pub struct Renderers {
    images: ImageResolver,
}

impl Renderers {
    pub fn new(images: ImageResolver) -> Self {
        Self { images }
    }
}

#[async_trait]
impl Capture for Renderers {
    async fn capture(
        &self,
        strategy: ExportStrategy,
        page: &ViewNode,
        cv: &CvData,
        t: &Translator,
    ) -> Result<Captured, ExportError> {
        match strategy {
            ExportStrategy::Print => {
                let title = format!("CV - {}", cv.personal_info.full_name());
                Ok(Captured {
                    bytes: html_document(page, &title, PRINT_HEAD).into_bytes(),
                    mime: "text/html; charset=utf-8",
                    extension: "html",
                })
            }
            ExportStrategy::Document => {
                let catalog = self.images.load_catalog(cv).await;
                let bytes = render_pdf(cv, t, &catalog);
                if bytes.is_empty() {
                    return Err(ExportError::Capture("document serialized to zero bytes".to_string()));
                }
                Ok(Captured {
                    bytes,
                    mime: "application/pdf",
                    extension: "pdf",
                })
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

struct Inner {
    site: Site,
    capture: Arc<dyn Capture>,
    settle: Arc<dyn SettleSignal>,
    notifier: Notifier,
    phase: watch::Sender<ExportPhase>,
}

#[derive(Clone)]
pub struct ExportOrchestrator {
    inner: Arc<Inner>,
}

impl ExportOrchestrator {
    pub fn new(
        site: Site,
        capture: Arc<dyn Capture>,
        settle: Arc<dyn SettleSignal>,
        notifier: Notifier,
    ) -> Self {
        let (phase, _) = watch::channel(ExportPhase::Idle);
        Self {
            inner: Arc::new(Inner {
                site,
                capture,
                settle,
                notifier,
                phase,
            }),
        }
    }

    pub fn phase(&self) -> ExportPhase {
        *self.inner.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExportPhase> {
        self.inner.phase.subscribe()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    fn set_phase(&self, phase: ExportPhase) {
        self.inner.phase.send_replace(phase);
    }

    /// Idle → Preparing as one atomic step.
    fn try_begin(&self) -> bool {
        self.inner.phase.send_if_modified(|phase| {
            if *phase != ExportPhase::Idle {
                return false;
            }
            *phase = ExportPhase::Preparing;
            true
        })
    }

    /// Runs one export to completion.
    ///
    /// Returns [`ExportError::Busy`] without side effects when another export
    /// is in flight.
    pub async fn export(&self, strategy: ExportStrategy) -> Result<ExportArtifact, ExportError> {
        if !self.try_begin() {
            info!(phase = ?self.phase(), "export already in progress, ignoring trigger");
            return Err(ExportError::Busy);
        }

        let this = self.clone();
        let run = tokio::spawn(async move { this.run(strategy).await });
        match run.await {
            Ok(result) => result,
            Err(e) => {
                // The run itself never panics past its capture guard; this is
                // a runtime shutdown. Leave the page usable.
                error!(error = %e, "export task did not complete");
                self.inner.site.live.release_export();
                self.set_phase(ExportPhase::Idle);
                Err(ExportError::Task(e.to_string()))
            }
        }
    }

    async fn run(&self, strategy: ExportStrategy) -> Result<ExportArtifact, ExportError> {
        let site = &self.inner.site;
        let (state, cv) = site.store.current();
        let t = Translator::new(site.resolver.clone(), state.language);
        info!(strategy = strategy.as_str(), language = %state.language, "export started");

        // Preparing
        site.live.hold_for_export();
        let journal = site.live.mutate(enter_export_mode);
        self.inner.settle.before_capture().await;

        // Capturing
        self.set_phase(ExportPhase::Capturing);
        let page = site.live.snapshot();
        let outcome = std::panic::AssertUnwindSafe(self.inner.capture.capture(strategy, &page, &cv, &t))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(ExportError::Capture(panic_message(payload.as_ref()))));

        // Restoring
        self.set_phase(ExportPhase::Restoring);
        self.inner.settle.after_capture().await;
        let reverted = site.live.mutate(|tree| journal.revert(tree));
        site.live.release_export();
        self.set_phase(ExportPhase::Idle);

        match outcome {
            Ok(captured) => {
                let filename = export_filename(&cv.personal_info, current_year(), captured.extension);
                info!(file = %filename, bytes = captured.bytes.len(), reverted, "export finished");
                self.inner
                    .notifier
                    .success(t.t_with("notifications.downloadSuccess", &[("file", filename.as_str())]));
                Ok(ExportArtifact {
                    filename,
                    mime: captured.mime,
                    bytes: bytes::Bytes::from(captured.bytes),
                })
            }
            Err(e) => {
                error!(error = %e, reverted, "export failed");
                self.inner.notifier.error(t.t("notifications.downloadError"));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::content::store::tests::make_store;
    use crate::export::{FixedDelay, Immediate, NotificationKind};
    use crate::i18n::{BundledLocaleSource, Resolver};
    use crate::models::Language;
    use crate::sections::AnimationLatch;

    /// Records what it saw; fails or panics on request.
    #[derive(Default)]
    struct FakeCapture {
        seen: Mutex<Vec<ViewNode>>,
        fail: bool,
        panic: bool,
    }

    #[async_trait]
    impl Capture for FakeCapture {
        async fn capture(
            &self,
            _strategy: ExportStrategy,
            page: &ViewNode,
            _cv: &CvData,
            _t: &Translator,
        ) -> Result<Captured, ExportError> {
            self.seen.lock().unwrap().push(page.clone());
            if self.panic {
                panic!("printer on fire");
            }
            if self.fail {
                return Err(ExportError::Capture("print dialog unavailable".to_string()));
            }
            Ok(Captured {
                bytes: b"%PDF-fake".to_vec(),
                mime: "application/pdf",
                extension: "pdf",
            })
        }
    }

    async fn make_site() -> Site {
        let store = make_store(Some(Language::En));
        store.hydrate().await;
        let resolver = Resolver::new(Arc::new(BundledLocaleSource), false);
        resolver.load().await.unwrap();
        let site = Site::new(store, resolver, Arc::new(AnimationLatch::new()));
        site.refresh();
        site
    }

    fn make_orchestrator(site: Site, capture: Arc<dyn Capture>, settle: Arc<dyn SettleSignal>) -> ExportOrchestrator {
        ExportOrchestrator::new(site, capture, settle, Notifier::new(Duration::from_millis(3000)))
    }

    #[tokio::test]
    async fn test_successful_export_captures_expanded_page_and_restores() {
        let site = make_site().await;
        let before = site.live.snapshot();
        let capture = Arc::new(FakeCapture::default());
        let orchestrator = make_orchestrator(site.clone(), capture.clone(), Arc::new(Immediate));

        let artifact = orchestrator.export(ExportStrategy::Document).await.unwrap();
        assert!(artifact.filename.starts_with("CV_"));
        assert!(artifact.filename.ends_with(&format!("_{}.pdf", current_year())));
        assert_eq!(artifact.mime, "application/pdf");

        let seen = capture.seen.lock().unwrap();
        let captured = &seen[0];
        assert!(captured.has_class("generating-pdf"));
        for content in captured.find_by_class("expanded-content") {
            assert_eq!(content.attr_value("data-expanded"), Some("true"));
        }
        assert!(captured.find_by_class("animate-enter").iter().all(|n| n.style_value("opacity") == Some("1")));

        assert_eq!(site.live.snapshot(), before);
        assert!(!site.live.is_held());
        assert_eq!(orchestrator.phase(), ExportPhase::Idle);

        let notes = orchestrator.notifier().active();
        assert_eq!(notes[0].kind, NotificationKind::Success);
        assert!(notes[0].message.contains(&artifact.filename));
    }

    #[tokio::test]
    async fn test_failed_capture_still_restores_and_notifies() {
        let site = make_site().await;
        let before = site.live.snapshot();
        let capture = Arc::new(FakeCapture {
            fail: true,
            ..FakeCapture::default()
        });
        let orchestrator = make_orchestrator(site.clone(), capture, Arc::new(Immediate));

        let err = orchestrator.export(ExportStrategy::Print).await.unwrap_err();
        assert!(matches!(err, ExportError::Capture(_)));
        assert_eq!(site.live.snapshot(), before);
        assert_eq!(orchestrator.phase(), ExportPhase::Idle);
        assert_eq!(orchestrator.notifier().active()[0].kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn test_panicking_capture_still_restores() {
        let site = make_site().await;
        let before = site.live.snapshot();
        let capture = Arc::new(FakeCapture {
            panic: true,
            ..FakeCapture::default()
        });
        let orchestrator = make_orchestrator(site.clone(), capture, Arc::new(Immediate));

        let err = orchestrator.export(ExportStrategy::Document).await.unwrap_err();
        assert!(err.to_string().contains("printer on fire"));
        assert_eq!(site.live.snapshot(), before);
        assert!(!site.live.is_held());
        assert_eq!(orchestrator.phase(), ExportPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_trigger_while_running_is_refused() {
        let site = make_site().await;
        let capture = Arc::new(FakeCapture::default());
        let orchestrator = make_orchestrator(site, capture.clone(), Arc::new(FixedDelay::default()));

        let first = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.export(ExportStrategy::Document).await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(orchestrator.phase(), ExportPhase::Preparing);

        let second = orchestrator.export(ExportStrategy::Print).await;
        assert!(matches!(second, Err(ExportError::Busy)));

        assert!(first.await.unwrap().is_ok());
        assert_eq!(capture.seen.lock().unwrap().len(), 1);
        assert_eq!(orchestrator.phase(), ExportPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_language_switch_during_export_is_deferred() {
        let site = make_site().await;
        let orchestrator = make_orchestrator(
            site.clone(),
            Arc::new(FakeCapture::default()),
            Arc::new(FixedDelay::default()),
        );
        let run = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.export(ExportStrategy::Document).await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        site.store.set_language(Language::Fr).await.unwrap();
        site.refresh();
        assert_eq!(site.live.snapshot().attr_value("lang"), Some("en"));

        run.await.unwrap().unwrap();
        let after = site.live.snapshot();
        assert_eq!(after.attr_value("lang"), Some("fr"));
        assert!(!after.has_class("generating-pdf"));
    }

    #[tokio::test]
    async fn test_print_strategy_serializes_expanded_page() {
        let site = make_site().await;
        let renderers = Renderers::new(ImageResolver::new("public", "http://127.0.0.1:9", Duration::from_secs(1)).unwrap());
        let orchestrator = make_orchestrator(site, Arc::new(renderers), Arc::new(Immediate));

        let artifact = orchestrator.export(ExportStrategy::Print).await.unwrap();
        assert!(artifact.filename.ends_with(".html"));
        let html = String::from_utf8(artifact.bytes.to_vec()).unwrap();
        assert!(html.contains("window.print()"));
        assert!(html.contains("generating-pdf"));
        assert!(html.contains("data-expanded=\"true\""));
    }
}
