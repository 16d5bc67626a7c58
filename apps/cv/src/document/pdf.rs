//! PDF serialization of laid-out pages.
//!
//! Text uses the standard Helvetica faces with WinAnsi encoding, so nothing
//! needs embedding except images. Each distinct image is written once and
//! referenced from every page that shows it.

use std::collections::HashMap;
use std::sync::Arc;

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::document::blocks::{
    tag_height, Element, Rgb, BAR_TRACK_HEIGHT, IMAGE_GAP, LEADING, TAG_GAP, TAG_PAD_X, TAG_PAD_Y,
};
use crate::document::font_metrics::{get_metrics, FontFace, PageConfig};
use crate::document::images::LoadedImage;
use crate::document::paginate::Page;

/// Distance from the top of a line box to the baseline, as a multiple of the font size.
const ASCENT: f32 = 0.78;
const FOOTER_SIZE: f32 = 7.5;

#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
}

/// Maps text to WinAnsi bytes. Characters outside the code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            'Œ' => 0x8c,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            'œ' => 0x9c,
            'Ÿ' => 0x9f,
            _ => b'?',
        })
        .collect()
}

struct Refs {
    next: i32,
}

impl Refs {
    fn bump(&mut self) -> Ref {
        let id = Ref::new(self.next);
        self.next += 1;
        id
    }
}

struct PageWriter<'a> {
    config: &'a PageConfig,
    content: Content,
}

impl PageWriter<'_> {
    /// Converts a distance from the top of the content area into PDF user space.
    fn y(&self, top: f32) -> f32 {
        self.config.height_pt - self.config.margin_pt - top
    }

    fn left(&self) -> f32 {
        self.config.margin_pt
    }

    fn text(&mut self, text: &str, face: FontFace, size: f32, color: Rgb, x: f32, baseline_top: f32) {
        let (r, g, b) = color.to_unit();
        let y = self.y(baseline_top);
        self.content.set_fill_rgb(r, g, b);
        self.content
            .begin_text()
            .set_font(Name(face.resource_name().as_bytes()), size)
            .next_line(x, y)
            .show(Str(&encode_win_ansi(text)))
            .end_text();
    }

    fn fill_rect(&mut self, color: Rgb, x: f32, top: f32, width: f32, height: f32) {
        let (r, g, b) = color.to_unit();
        let y = self.y(top + height);
        self.content.set_fill_rgb(r, g, b);
        self.content.rect(x, y, width, height);
        self.content.fill_nonzero();
    }

    fn element(&mut self, element: &Element, top: f32, image_names: &HashMap<*const LoadedImage, String>) {
        let left = self.left();
        let width = self.config.content_width();
        match element {
            Element::Text {
                lines,
                face,
                size,
                color,
                indent,
            } => {
                let line_height = size * LEADING;
                let pad = (line_height - size) / 2.0;
                for (i, line) in lines.iter().enumerate() {
                    let baseline = top + i as f32 * line_height + pad + size * ASCENT;
                    self.text(line, *face, *size, *color, left + indent, baseline);
                }
            }
            Element::Tags { rows, size } => {
                let h = tag_height(*size);
                for (r, row) in rows.iter().enumerate() {
                    let row_top = top + r as f32 * (h + TAG_GAP);
                    let mut x = left;
                    for tag in row {
                        self.fill_rect(tag.background, x, row_top, tag.width, h);
                        let baseline = row_top + TAG_PAD_Y + size * ASCENT;
                        self.text(&tag.label, FontFace::Bold, *size, tag.foreground, x + TAG_PAD_X, baseline);
                        x += tag.width + TAG_GAP;
                    }
                }
            }
            Element::Bar {
                label,
                level,
                percent,
                color,
                size,
            } => {
                let baseline = top + size * ASCENT;
                self.text(label, FontFace::Bold, *size, Rgb::TEXT, left, baseline);
                let level_w = get_metrics(FontFace::Regular).width_pt(level, *size);
                self.text(level, FontFace::Regular, *size, Rgb::MUTED, left + width - level_w, baseline);
                let track_top = top + size * LEADING + 1.0;
                self.fill_rect(Rgb::TRACK, left, track_top, width, BAR_TRACK_HEIGHT);
                let filled = width * (*percent).min(100) as f32 / 100.0;
                self.fill_rect(*color, left, track_top, filled, BAR_TRACK_HEIGHT);
            }
            Element::Images { images, height } => {
                let mut x = left;
                for image in images {
                    let w = image.width_at(*height);
                    if let Some(name) = image_names.get(&Arc::as_ptr(image)) {
                        let y = self.y(top + height);
                        self.content.save_state();
                        self.content.transform([w, 0.0, 0.0, *height, x, y]);
                        self.content.x_object(Name(name.as_bytes()));
                        self.content.restore_state();
                    }
                    x += w + IMAGE_GAP;
                }
            }
            Element::Rule { color, thickness } => {
                let (r, g, b) = color.to_unit();
                let y = self.y(top + 2.0 + thickness / 2.0);
                self.content.set_stroke_rgb(r, g, b);
                self.content.set_line_width(*thickness);
                self.content.move_to(left, y);
                self.content.line_to(left + width, y);
                self.content.stroke();
            }
            Element::Gap(_) => {}
        }
    }

    fn footer(&mut self, number: usize, total: usize) {
        let label = format!("{number} / {total}");
        let w = get_metrics(FontFace::Regular).width_pt(&label, FOOTER_SIZE);
        let x = self.config.width_pt - self.config.margin_pt - w;
        let y = self.config.margin_pt / 2.0;
        let (r, g, b) = Rgb::MUTED.to_unit();
        self.content.set_fill_rgb(r, g, b);
        self.content
            .begin_text()
            .set_font(Name(FontFace::Regular.resource_name().as_bytes()), FOOTER_SIZE)
            .next_line(x, y)
            .show(Str(label.as_bytes()))
            .end_text();
    }
}

/// Serializes `pages` into a complete PDF file.
pub fn write_pdf(pages: &[Page], config: &PageConfig, info: &DocumentInfo) -> Vec<u8> {
    let mut refs = Refs { next: 1 };
    let catalog_id = refs.bump();
    let tree_id = refs.bump();
    let info_id = refs.bump();
    let regular_id = refs.bump();
    let bold_id = refs.bump();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.document_info(info_id)
        .title(TextStr(&info.title))
        .author(TextStr(&info.author))
        .creator(TextStr("cv"));
    for (id, face) in [(regular_id, FontFace::Regular), (bold_id, FontFace::Bold)] {
        pdf.type1_font(id)
            .base_font(Name(face.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    // Every distinct image once, keyed by identity.
    let mut image_ids: HashMap<*const LoadedImage, (Ref, String)> = HashMap::new();
    for page in pages {
        for placed in &page.items {
            for element in &placed.block.elements {
                let Element::Images { images, .. } = element else {
                    continue;
                };
                for image in images {
                    let key = Arc::as_ptr(image);
                    if image_ids.contains_key(&key) {
                        continue;
                    }
                    let id = refs.bump();
                    let name = format!("Im{}", image_ids.len() + 1);
                    let mut xobject = pdf.image_xobject(id, &image.data);
                    xobject.filter(Filter::FlateDecode);
                    xobject.width(image.width as i32);
                    xobject.height(image.height as i32);
                    xobject.color_space().device_rgb();
                    xobject.bits_per_component(8);
                    xobject.finish();
                    image_ids.insert(key, (id, name));
                }
            }
        }
    }
    let image_names: HashMap<*const LoadedImage, String> = image_ids
        .iter()
        .map(|(k, (_, name))| (*k, name.clone()))
        .collect();

    let total = pages.len();
    let mut page_ids = Vec::with_capacity(total);
    for page in pages {
        let page_id = refs.bump();
        let content_id = refs.bump();
        page_ids.push(page_id);

        let mut writer = PageWriter {
            config,
            content: Content::new(),
        };
        for placed in &page.items {
            let mut top = placed.y;
            for element in &placed.block.elements {
                writer.element(element, top, &image_names);
                top += element.height();
            }
        }
        writer.footer(page.number, total);
        pdf.stream(content_id, &writer.content.finish());

        let mut pdf_page = pdf.page(page_id);
        pdf_page.media_box(Rect::new(0.0, 0.0, config.width_pt, config.height_pt));
        pdf_page.parent(tree_id);
        pdf_page.contents(content_id);
        let mut resources = pdf_page.resources();
        resources
            .fonts()
            .pair(Name(FontFace::Regular.resource_name().as_bytes()), regular_id)
            .pair(Name(FontFace::Bold.resource_name().as_bytes()), bold_id);
        let used: Vec<&(Ref, String)> = page
            .items
            .iter()
            .flat_map(|p| p.block.elements.iter())
            .filter_map(|e| match e {
                Element::Images { images, .. } => Some(images),
                _ => None,
            })
            .flatten()
            .filter_map(|image| image_ids.get(&Arc::as_ptr(image)))
            .collect();
        if !used.is_empty() {
            let mut x_objects = resources.x_objects();
            for (id, name) in used {
                x_objects.pair(Name(name.as_bytes()), *id);
            }
        }
        resources.finish();
        pdf_page.finish();
    }

    pdf.pages(tree_id)
        .kids(page_ids.iter().copied())
        .count(total as i32);
    pdf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::blocks::{Block, BlockKind};
    use crate::document::font_metrics::a4_page_config;
    use crate::document::images::decode;
    use crate::document::images::tests::make_png;
    use crate::document::paginate::Placed;

    fn make_page(number: usize, elements: Vec<Element>) -> Page {
        let mut block = Block::new(BlockKind::Entry, true);
        for e in elements {
            block.push(e);
        }
        Page {
            number,
            used: block.height(),
            items: vec![Placed { y: 0.0, block }],
        }
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(
            encode_win_ansi("Présent • 5€"),
            vec![b'P', b'r', 0xe9, b's', b'e', b'n', b't', b' ', 0x95, b' ', b'5', 0x80]
        );
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
    }

    #[test]
    fn test_writes_one_object_per_distinct_image() {
        let config = a4_page_config();
        let image = Arc::new(decode("a.png", &make_png(8, 8)).unwrap());
        let row = || Element::Images {
            images: vec![image.clone()],
            height: 20.0,
        };
        let pages = vec![
            make_page(
                1,
                vec![
                    Element::text("Hello", FontFace::Bold, 12.0, Rgb::TEXT, 0.0, 300.0).unwrap(),
                    row(),
                ],
            ),
            make_page(2, vec![row()]),
        ];
        let bytes = write_pdf(&pages, &config, &DocumentInfo::default());
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("%PDF-"));
        assert_eq!(text.matches("/Subtype /Image").count(), 1);
        assert!(text.contains("/Count 2"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("/WinAnsiEncoding"));
    }
}
