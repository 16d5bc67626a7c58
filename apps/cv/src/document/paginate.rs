//! Pagination: places blocks onto fixed-size pages.
//!
//! Input is a list of page groups. Each group starts on a fresh page and holds
//! section runs; a run is a heading, the heading to repeat on overflow pages,
//! and the run's blocks. Placement rules:
//!
//! - a `keep_together` block that does not fit moves whole to the next page;
//! - one taller than a full page starts a fresh page and flows, with a warning;
//! - a section title is placed only if the start of the next block fits under it;
//! - other blocks flow line by line across page boundaries.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::blocks::{Block, BlockKind};
use crate::document::font_metrics::PageConfig;

/// A block placed at `y` points below the top of the content area.
#[derive(Debug, Clone)]
pub struct Placed {
    pub y: f32,
    pub block: Block,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub number: usize,
    pub items: Vec<Placed>,
    pub used: f32,
}

impl Page {
    fn new(number: usize) -> Self {
        Self {
            number,
            items: Vec::new(),
            used: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn text_lines(&self) -> Vec<&str> {
        self.items.iter().flat_map(|p| p.block.text_lines()).collect()
    }
}

/// A section within a page group.
#[derive(Debug, Clone, Default)]
pub struct SectionRun {
    pub heading: Option<Block>,
    /// Heading placed at the top of every overflow page of this run.
    pub continued: Option<Block>,
    pub blocks: Vec<Block>,
}

/// Runs that start together on a fresh page.
#[derive(Debug, Clone, Default)]
pub struct PageGroup {
    pub runs: Vec<SectionRun>,
}

impl PageGroup {
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.blocks.is_empty())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout engine
// ────────────────────────────────────────────────────────────────────────────

struct Paginator<'a> {
    config: &'a PageConfig,
    pages: Vec<Page>,
    current: Page,
    /// Items `break_page` put at the top of the current page.
    carried: usize,
}

impl<'a> Paginator<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            current: Page::new(1),
            carried: 0,
        }
    }

    fn capacity(&self) -> f32 {
        self.config.content_height()
    }

    fn remaining(&self) -> f32 {
        self.capacity() - self.current.used
    }

    fn put(&mut self, block: Block) {
        let height = block.height();
        self.current.items.push(Placed {
            y: self.current.used,
            block,
        });
        self.current.used += height;
    }

    fn break_page(&mut self, continued: Option<&Block>) {
        let number = self.current.number + 1;
        let full = std::mem::replace(&mut self.current, Page::new(number));
        self.pages.push(full);
        if let Some(heading) = continued {
            self.put(heading.clone());
        }
        self.carried = self.current.items.len();
    }

    /// True while the page holds nothing but a repeated heading.
    fn at_page_top(&self) -> bool {
        self.current.items.len() <= self.carried
    }

    fn place_group(&mut self, group: PageGroup) {
        if !self.current.is_empty() {
            self.break_page(None);
        }
        for run in group.runs {
            if run.blocks.is_empty() {
                continue;
            }
            self.place_run(run);
        }
    }

    fn place_run(&mut self, run: SectionRun) {
        let SectionRun {
            heading,
            continued,
            blocks,
        } = run;

        if let Some(heading) = heading {
            let lead = blocks
                .first()
                .map(|b| b.lead_height().min(self.capacity() - heading.height()))
                .unwrap_or(0.0);
            if heading.height() + lead > self.remaining() && !self.current.is_empty() {
                self.break_page(None);
            }
            self.put(heading);
        }

        for block in blocks {
            self.place_block(block, continued.as_ref());
        }
    }

    fn place_block(&mut self, block: Block, continued: Option<&Block>) {
        let height = block.height();
        if height <= self.remaining() {
            self.put(block);
            return;
        }

        if block.keep_together || block.kind == BlockKind::SectionTitle {
            let room = self.capacity() - continued.map(Block::height).unwrap_or(0.0);
            if height <= room {
                self.break_page(continued);
                self.put(block);
                return;
            }
            warn!(
                page = self.current.number,
                height,
                capacity = room,
                "block taller than a page, letting it flow"
            );
            if !self.at_page_top() {
                self.break_page(continued);
            }
        }

        self.flow(block, continued);
    }

    fn flow(&mut self, mut block: Block, continued: Option<&Block>) {
        loop {
            let (head, tail) = block.split(self.remaining());
            let placed_any = head.is_some();
            if let Some(head) = head {
                self.put(head);
            }
            let Some(tail) = tail else {
                return;
            };
            if !placed_any && self.at_page_top() {
                // Not even one element fits on a fresh page; place it anyway.
                warn!(page = self.current.number, "element taller than a page");
                self.put(tail);
                return;
            }
            self.break_page(continued);
            block = tail;
        }
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Lays out every group. Empty groups produce no page.
pub fn paginate(groups: Vec<PageGroup>, config: &PageConfig) -> Vec<Page> {
    let mut paginator = Paginator::new(config);
    for group in groups.into_iter().filter(|g| !g.is_empty()) {
        paginator.place_group(group);
    }
    paginator.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Page fill analysis
// ────────────────────────────────────────────────────────────────────────────

const SPARSE_PAGE_THRESHOLD: f32 = 0.75;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageFillVerdict {
    Acceptable,
    /// More than three quarters of the page is blank.
    TooMuchWhitespace,
    /// Content runs past the bottom margin.
    Overflow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFillAnalysis {
    pub page: usize,
    pub used_pt: f32,
    pub available_pt: f32,
    pub whitespace_fraction: f32,
    pub overflow_fraction: f32,
    pub verdict: PageFillVerdict,
}

pub fn analyze_page_fill(page: &Page, config: &PageConfig) -> PageFillAnalysis {
    let available = config.content_height();
    let fill_ratio = page.used / available;
    let whitespace_fraction = (1.0_f32 - fill_ratio).max(0.0);
    let overflow_fraction = (fill_ratio - 1.0_f32).max(0.0);

    let verdict = if overflow_fraction > 1e-3 {
        PageFillVerdict::Overflow
    } else if whitespace_fraction > SPARSE_PAGE_THRESHOLD {
        PageFillVerdict::TooMuchWhitespace
    } else {
        PageFillVerdict::Acceptable
    };

    PageFillAnalysis {
        page: page.number,
        used_pt: page.used,
        available_pt: available,
        whitespace_fraction,
        overflow_fraction,
        verdict,
    }
}
