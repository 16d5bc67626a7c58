//! Layout units of the document rendition.
//!
//! A [`Block`] is a vertical stack of [`Element`]s whose height is fully
//! determined by its content, so the paginator can measure before placing.
//! Blocks marked `keep_together` are never split across a page boundary.

use std::sync::Arc;

use crate::document::font_metrics::{get_metrics, FontFace};
use crate::document::images::LoadedImage;
use crate::document::measure::wrap_lines;

/// Line advance as a multiple of the font size.
pub const LEADING: f32 = 1.35;

pub const TAG_PAD_X: f32 = 4.0;
pub const TAG_PAD_Y: f32 = 2.5;
pub const TAG_GAP: f32 = 4.0;
pub const BAR_TRACK_HEIGHT: f32 = 5.0;
pub const IMAGE_GAP: f32 = 6.0;

// ────────────────────────────────────────────────────────────────────────────
// Colors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const TEXT: Rgb = Rgb(0x1f, 0x29, 0x37);
    pub const MUTED: Rgb = Rgb(0x6b, 0x72, 0x80);
    pub const ACCENT: Rgb = Rgb(0x25, 0x63, 0xeb);
    pub const TRACK: Rgb = Rgb(0xe5, 0xe7, 0xeb);
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    /// Parses `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn hex_or(hex: &str, fallback: Rgb) -> Rgb {
        Rgb::from_hex(hex).unwrap_or(fallback)
    }

    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Elements
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub label: String,
    pub width: f32,
    pub background: Rgb,
    pub foreground: Rgb,
}

#[derive(Debug, Clone)]
pub enum Element {
    Text {
        lines: Vec<String>,
        face: FontFace,
        size: f32,
        color: Rgb,
        indent: f32,
    },
    /// Colored badges flowed into rows.
    Tags { rows: Vec<Vec<Tag>>, size: f32 },
    /// Skill level bar: a label line above a track filled to `percent`.
    Bar {
        label: String,
        level: String,
        percent: u8,
        color: Rgb,
        size: f32,
    },
    /// One row of images scaled to a common height.
    Images {
        images: Vec<Arc<LoadedImage>>,
        height: f32,
    },
    Rule { color: Rgb, thickness: f32 },
    Gap(f32),
}

impl Element {
    /// Wraps `text` to the available width. Blank text yields `None`.
    pub fn text(text: &str, face: FontFace, size: f32, color: Rgb, indent: f32, width: f32) -> Option<Element> {
        let lines = wrap_lines(text, get_metrics(face), size, width - indent);
        (!lines.is_empty()).then_some(Element::Text {
            lines,
            face,
            size,
            color,
            indent,
        })
    }

    /// Flows `(label, background, foreground)` badges into rows no wider than `width`.
    pub fn tags(labels: Vec<(String, Rgb, Rgb)>, size: f32, width: f32) -> Option<Element> {
        let metrics = get_metrics(FontFace::Bold);
        let mut rows: Vec<Vec<Tag>> = Vec::new();
        let mut row: Vec<Tag> = Vec::new();
        let mut row_width = 0.0_f32;

        for (label, background, foreground) in labels {
            let label = label.trim().to_string();
            if label.is_empty() {
                continue;
            }
            let tag_width = (metrics.width_pt(&label, size) + 2.0 * TAG_PAD_X).min(width);
            let gap = if row.is_empty() { 0.0 } else { TAG_GAP };
            if !row.is_empty() && row_width + gap + tag_width > width {
                rows.push(std::mem::take(&mut row));
                row_width = 0.0;
            }
            row_width += if row.is_empty() { tag_width } else { TAG_GAP + tag_width };
            row.push(Tag {
                label,
                width: tag_width,
                background,
                foreground,
            });
        }
        if !row.is_empty() {
            rows.push(row);
        }
        (!rows.is_empty()).then_some(Element::Tags { rows, size })
    }

    pub fn height(&self) -> f32 {
        match self {
            Element::Text { lines, size, .. } => lines.len() as f32 * size * LEADING,
            Element::Tags { rows, size } => {
                let n = rows.len() as f32;
                n * tag_height(*size) + (n - 1.0).max(0.0) * TAG_GAP
            }
            Element::Bar { size, .. } => size * LEADING + BAR_TRACK_HEIGHT + 3.0,
            Element::Images { height, .. } => height + IMAGE_GAP,
            Element::Rule { thickness, .. } => thickness + 4.0,
            Element::Gap(h) => *h,
        }
    }

    /// Splits text by lines and tags by rows so the head fits in `available`.
    /// Other elements never split.
    fn split_lines(self, available: f32) -> (Option<Element>, Option<Element>) {
        match self {
            Element::Text {
                mut lines,
                face,
                size,
                color,
                indent,
            } => {
                let fit = (available / (size * LEADING)).floor().max(0.0) as usize;
                if fit == 0 {
                    return (
                        None,
                        Some(Element::Text {
                            lines,
                            face,
                            size,
                            color,
                            indent,
                        }),
                    );
                }
                let tail = lines.split_off(fit.min(lines.len()));
                let head = Element::Text {
                    lines,
                    face,
                    size,
                    color,
                    indent,
                };
                let tail = (!tail.is_empty()).then_some(Element::Text {
                    lines: tail,
                    face,
                    size,
                    color,
                    indent,
                });
                (Some(head), tail)
            }
            Element::Tags { mut rows, size } => {
                let row = tag_height(size) + TAG_GAP;
                let fit = ((available + TAG_GAP) / row).floor().max(0.0) as usize;
                if fit == 0 {
                    return (None, Some(Element::Tags { rows, size }));
                }
                let tail = rows.split_off(fit.min(rows.len()));
                let tail = (!tail.is_empty()).then_some(Element::Tags { rows: tail, size });
                (Some(Element::Tags { rows, size }), tail)
            }
            other => (None, Some(other)),
        }
    }

    pub fn text_lines(&self) -> Vec<&str> {
        match self {
            Element::Text { lines, .. } => lines.iter().map(String::as_str).collect(),
            Element::Tags { rows, .. } => rows.iter().flatten().map(|t| t.label.as_str()).collect(),
            Element::Bar { label, level, .. } => vec![label.as_str(), level.as_str()],
            _ => Vec::new(),
        }
    }
}

pub fn tag_height(size: f32) -> f32 {
    size + 2.0 * TAG_PAD_Y
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    /// Always placed on the same page as the start of the block after it.
    SectionTitle,
    Paragraph,
    Entry,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    pub keep_together: bool,
    pub elements: Vec<Element>,
}

impl Block {
    pub fn new(kind: BlockKind, keep_together: bool) -> Self {
        Self {
            kind,
            keep_together,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn push_opt(&mut self, element: Option<Element>) {
        if let Some(element) = element {
            self.elements.push(element);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements
            .iter()
            .all(|e| matches!(e, Element::Gap(_) | Element::Rule { .. }))
    }

    pub fn height(&self) -> f32 {
        self.elements.iter().map(Element::height).sum()
    }

    /// Height of the smallest head the block can be split at.
    pub fn lead_height(&self) -> f32 {
        if self.keep_together {
            return self.height();
        }
        match self.elements.first() {
            Some(Element::Text { size, .. }) => size * LEADING,
            Some(other) => other.height(),
            None => 0.0,
        }
    }

    /// Splits off the largest head that fits in `available`.
    ///
    /// Returns `(head, tail)`; the head is `None` when not even the first line
    /// fits, the tail is `None` when everything fit.
    pub fn split(self, available: f32) -> (Option<Block>, Option<Block>) {
        let Block {
            kind,
            keep_together,
            elements,
        } = self;
        let mut head = Block::new(kind, keep_together);
        let mut used = 0.0_f32;
        let mut rest = elements.into_iter();

        while let Some(element) = rest.next() {
            let h = element.height();
            if used + h <= available {
                used += h;
                head.push(element);
                continue;
            }
            let (fits, remainder) = element.split_lines(available - used);
            head.push_opt(fits);
            let mut tail = Block::new(kind, keep_together);
            tail.push_opt(remainder);
            tail.elements.extend(rest);
            let head = (!head.elements.is_empty()).then_some(head);
            return (head, Some(tail));
        }
        (Some(head), None)
    }

    /// All text carried by the block, for coverage checks.
    pub fn text_lines(&self) -> Vec<&str> {
        self.elements.iter().flat_map(Element::text_lines).collect()
    }
}
