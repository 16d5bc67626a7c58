//! Interactive single-page view.
//!
//! Each section renderer is a pure function of the content aggregate, a
//! translator bound to the active language, and the animation registry. Every
//! section runs inside its own failure boundary; the page as a whole runs
//! inside an outer one.

pub mod animation;
pub mod boundary;
pub mod education;
pub mod experience;
pub mod home;
pub mod projects;
pub mod recommendations;
pub mod skills;
pub mod view;

use std::str::FromStr;

use thiserror::Error;

use crate::content::StoreState;
use crate::i18n::Translator;
use crate::models::{CategoryFilter, CvData, StatusFilter};
use crate::projects::ProjectSelection;

pub use animation::{AnimationLatch, AnimationRegistry};
pub use boundary::render_guarded;
pub use view::{el, ViewNode};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{section}: missing {what}")]
    Missing { section: SectionId, what: String },

    #[error("{section}: {reason}")]
    Invalid { section: SectionId, reason: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Section identity
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Home,
    Recommendations,
    Experience,
    Skills,
    Education,
    Projects,
}

impl SectionId {
    /// Page order of the interactive view.
    pub const PAGE_ORDER: [SectionId; 6] = [
        SectionId::Home,
        SectionId::Recommendations,
        SectionId::Experience,
        SectionId::Skills,
        SectionId::Education,
        SectionId::Projects,
    ];

    /// Stable in-page anchor.
    pub fn anchor(&self) -> &'static str {
        match self {
            SectionId::Home => "home",
            SectionId::Recommendations => "recommendations",
            SectionId::Experience => "experience",
            SectionId::Skills => "skills",
            SectionId::Education => "education",
            SectionId::Projects => "projects",
        }
    }

    /// Name shown by the failure boundary. Deliberately not localized so it
    /// still renders when translations are unavailable.
    pub fn display_name(&self) -> &'static str {
        match self {
            SectionId::Home => "Home",
            SectionId::Recommendations => "Recommendations",
            SectionId::Experience => "Professional Experience",
            SectionId::Skills => "Skills",
            SectionId::Education => "Education",
            SectionId::Projects => "Projects",
        }
    }

    pub fn nav_key(&self) -> String {
        format!("navigation.{}", self.anchor())
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.anchor())
    }
}

/// Anchor of the pseudo-section that triggers the export instead of scrolling.
pub const DOWNLOAD_ANCHOR: &str = "download-cv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Section(SectionId),
    Download,
}

impl FromStr for NavTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let anchor = s.trim().trim_start_matches('#');
        if anchor == DOWNLOAD_ANCHOR {
            return Ok(NavTarget::Download);
        }
        SectionId::PAGE_ORDER
            .into_iter()
            .find(|id| id.anchor() == anchor)
            .map(NavTarget::Section)
            .ok_or_else(|| format!("unknown section anchor '{anchor}'"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Render context
// ────────────────────────────────────────────────────────────────────────────

/// Interactive state of the project grid.
#[derive(Debug, Clone, Default)]
pub struct ProjectView {
    pub status: StatusFilter,
    pub category: CategoryFilter,
    pub selection: ProjectSelection,
}

pub struct RenderContext<'a> {
    pub data: &'a CvData,
    pub t: &'a Translator,
    pub animations: &'a dyn AnimationRegistry,
    pub projects: &'a ProjectView,
}

pub type SectionRenderer = fn(&RenderContext<'_>) -> Result<ViewNode, RenderError>;

pub fn renderer_for(section: SectionId) -> SectionRenderer {
    match section {
        SectionId::Home => home::render,
        SectionId::Recommendations => recommendations::render,
        SectionId::Experience => experience::render,
        SectionId::Skills => skills::render,
        SectionId::Education => education::render,
        SectionId::Projects => projects::render,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared building blocks
// ────────────────────────────────────────────────────────────────────────────

/// Marks `node` for its entrance animation the first time `key` is rendered;
/// afterwards it renders in its resting state.
pub fn entrance(node: ViewNode, key: &str, animations: &dyn AnimationRegistry) -> ViewNode {
    let node = node.attr("data-animate", key);
    if animations.has(key) {
        return node.class("animated");
    }
    animations.mark_animated(key);
    node.class("animate-enter")
        .style("opacity", "0")
        .style("transform", "translateY(20px)")
}

/// Content hidden behind a "show more" toggle.
pub fn collapsible(id: &str, toggle_label: String, content: ViewNode) -> ViewNode {
    el("div")
        .class("collapsible")
        .child(
            el("button")
                .class("toggle-details web-only")
                .attr("aria-controls", id)
                .attr("aria-expanded", "false")
                .text(toggle_label),
        )
        .child(
            content
                .id(id)
                .class("expanded-content")
                .attr("data-expanded", "false")
                .style("display", "none"),
        )
}

pub fn section_shell(section: SectionId, title: String) -> ViewNode {
    el("section")
        .id(section.anchor())
        .class("cv-section")
        .child(el("h2").class("section-title").text(title))
}

pub fn tag_list(class: &str, items: &[String]) -> ViewNode {
    el("ul")
        .class(class)
        .children(items.iter().map(|item| el("li").class("tag").text(item.clone())))
}

pub fn date_range(start: &str, end: Option<&str>, open_label: String) -> String {
    format!("{} - {}", start, end.map(str::to_string).unwrap_or(open_label))
}

// ────────────────────────────────────────────────────────────────────────────
// Page
// ────────────────────────────────────────────────────────────────────────────

fn navigation(t: &Translator) -> ViewNode {
    let links = SectionId::PAGE_ORDER.into_iter().map(|section| {
        el("a")
            .attr("href", format!("#{}", section.anchor()))
            .text(t.t(&section.nav_key()))
    });
    el("nav")
        .class("navigation web-only")
        .children(links)
        .child(
            el("a")
                .class("download-cv")
                .attr("href", format!("#{DOWNLOAD_ANCHOR}"))
                .text(t.t("navigation.downloadCv")),
        )
        .child(
            el("button")
                .class("language-toggle")
                .attr("data-language", t.language().toggled().code())
                .attr("title", t.t("navigation.languageToggle"))
                .text(t.language().toggled().code().to_uppercase()),
        )
}

fn loading_placeholder() -> ViewNode {
    el("body").class("cv-app").child(
        el("main")
            .id("main-content")
            .child(el("div").class("loading-placeholder").attr("aria-busy", "true")),
    )
}

/// Renders the whole page for one store snapshot.
///
/// Before the store is hydrated a neutral placeholder is returned so no
/// language-dependent text appears in the wrong language.
pub fn render_page(ctx: &RenderContext<'_>, store: StoreState) -> ViewNode {
    if !store.hydrated {
        return loading_placeholder();
    }
    render_guarded("Page", "app", || {
        let sections = SectionId::PAGE_ORDER.into_iter().map(|section| {
            render_guarded(section.display_name(), section.anchor(), || {
                renderer_for(section)(ctx)
            })
        });
        Ok(el("body")
            .class("cv-app")
            .attr("lang", ctx.t.language().code())
            .child(el("div").class("scroll-progress-bar web-only"))
            .child(navigation(ctx.t))
            .child(el("main").id("main-content").children(sections))
            .child(el("button").class("scroll-to-top web-only").text("↑")))
    })
}
