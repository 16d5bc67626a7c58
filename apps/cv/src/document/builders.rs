//! Content-to-layout mapping: one builder per kind of entry.
//!
//! Each builder decides on its own which sub-fields to show, following the
//! same conditions as the interactive cards (empty descriptions are omitted,
//! sub-projects replace the flat technology list when present). A builder
//! never fails the document: blank required fields get a placeholder and a
//! warning, entries with nothing to show are skipped.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::warn;

use crate::document::blocks::{Block, BlockKind, Element, Rgb, IMAGE_GAP};
use crate::document::font_metrics::{FontFace, PageConfig};
use crate::document::images::ImageCatalog;
use crate::i18n::Translator;
use crate::models::{
    CompetenceCategory, Experience, Formation, PersonalInfo, Project, ProjectStatus, Recommendation,
};
use crate::projects::{
    all_images, all_technologies, level_swatch, skill_percentage, sort_technologies_by_priority,
    technology_family,
};
use crate::sections::skills::level_label_key;

/// Images shown on a project card on the first projects page.
pub const PRIMARY_IMAGE_LIMIT: usize = 4;
/// Images shown on a project card in the additional projects run.
pub const ADDITIONAL_IMAGE_LIMIT: usize = 2;

const NAME_SIZE: f32 = 22.0;
const SECTION_TITLE_SIZE: f32 = 14.0;
const ENTRY_TITLE_SIZE: f32 = 11.5;
const SMALL_SIZE: f32 = 8.5;
const TAG_SIZE: f32 = 7.5;
const BULLET_INDENT: f32 = 10.0;
const PROFILE_IMAGE_HEIGHT: f32 = 56.0;
const LOGO_HEIGHT: f32 = 22.0;
const PROJECT_IMAGE_HEIGHT: f32 = 72.0;
const ENTRY_GAP: f32 = 10.0;

pub struct DocumentContext<'a> {
    pub t: &'a Translator,
    pub config: &'a PageConfig,
    pub images: &'a ImageCatalog,
}

impl DocumentContext<'_> {
    fn width(&self) -> f32 {
        self.config.content_width()
    }

    fn body(&self) -> f32 {
        self.config.body_size_pt
    }

    fn text(&self, text: &str, face: FontFace, size: f32, color: Rgb) -> Option<Element> {
        Element::text(text, face, size, color, 0.0, self.width())
    }

    fn indented(&self, text: &str, size: f32, color: Rgb) -> Option<Element> {
        Element::text(text, FontFace::Regular, size, color, BULLET_INDENT, self.width())
    }

    fn subheading(&self, key: &str) -> Option<Element> {
        self.text(&self.t.t(key), FontFace::Bold, self.body(), Rgb::TEXT)
    }

    fn bullets(&self, block: &mut Block, items: &[String]) {
        for item in items.iter().filter(|i| !i.trim().is_empty()) {
            block.push_opt(self.indented(&format!("• {}", item.trim()), self.body(), Rgb::TEXT));
        }
    }

    /// Up to `limit` catalogued images laid side by side, skipping what does not fit.
    fn image_row<'r>(&self, refs: impl IntoIterator<Item = &'r str>, height: f32, limit: usize) -> Option<Element> {
        let mut images = Vec::new();
        let mut used = 0.0_f32;
        for reference in refs {
            if images.len() >= limit {
                break;
            }
            let Some(image) = self.images.get(reference) else {
                continue;
            };
            let w = image.width_at(height);
            let gap = if images.is_empty() { 0.0 } else { IMAGE_GAP };
            if used + gap + w > self.width() {
                continue;
            }
            used += gap + w;
            images.push(image);
        }
        (!images.is_empty()).then_some(Element::Images { images, height })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Tag and accent color of a project status on the printed page.
pub fn document_status_color(status: &ProjectStatus) -> Rgb {
    let hex = match status {
        ProjectStatus::Completed => "#10b981",
        ProjectStatus::InProgress => "#f59e0b",
        ProjectStatus::Started => "#3b82f6",
        ProjectStatus::Archived => "#6b7280",
        ProjectStatus::Reflecting | ProjectStatus::Unknown(_) => "#8b5cf6",
    };
    Rgb::hex_or(hex, Rgb::MUTED)
}

/// Runs one entry builder, turning a panic into a skipped entry.
fn guarded(section: &str, entry: u32, build: impl FnOnce() -> Option<Block>) -> Option<Block> {
    match catch_unwind(AssertUnwindSafe(build)) {
        Ok(block) => block,
        Err(_) => {
            warn!(section, entry, "entry could not be laid out, skipping");
            None
        }
    }
}

/// The entry's name, or a localized placeholder when it is blank.
fn entry_name(ctx: &DocumentContext<'_>, section: &str, entry: u32, name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        warn!(section, entry, reason = "blank name", "rendering entry with placeholder");
        return ctx.t.t("document.untitled");
    }
    name.to_string()
}

fn date_range(start: &str, end: Option<&str>, open: String) -> String {
    let start = start.trim();
    let end = end.map(str::trim).filter(|e| !e.is_empty()).map(str::to_string).unwrap_or(open);
    if start.is_empty() {
        end
    } else {
        format!("{start} - {end}")
    }
}

fn technology_tags(ctx: &DocumentContext<'_>, technologies: &[String], indent: bool) -> Option<Element> {
    let labels = sort_technologies_by_priority(technologies)
        .into_iter()
        .map(|tech| {
            let color = Rgb::hex_or(technology_family(&tech).color(), Rgb::MUTED);
            (tech, color, Rgb::WHITE)
        })
        .collect();
    let width = if indent { ctx.width() - BULLET_INDENT } else { ctx.width() };
    Element::tags(labels, TAG_SIZE, width)
}

fn join_present(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

// ────────────────────────────────────────────────────────────────────────────
// Builders
// ────────────────────────────────────────────────────────────────────────────

pub fn section_title(ctx: &DocumentContext<'_>, title: &str) -> Block {
    let mut block = Block::new(BlockKind::SectionTitle, true);
    block.push(Element::Gap(4.0));
    block.push_opt(ctx.text(title, FontFace::Bold, SECTION_TITLE_SIZE, Rgb::ACCENT));
    block.push(Element::Rule {
        color: Rgb::ACCENT,
        thickness: 1.0,
    });
    block.push(Element::Gap(4.0));
    block
}

/// Heading repeated at the top of each overflow page of a section.
pub fn continued_title(ctx: &DocumentContext<'_>, title: &str) -> Block {
    section_title(ctx, &format!("{title} ({})", ctx.t.t("document.continued")))
}

pub fn header_block(ctx: &DocumentContext<'_>, info: &PersonalInfo) -> Block {
    let mut block = Block::new(BlockKind::Header, true);
    block.push_opt(
        info.profile_image
            .as_deref()
            .and_then(|src| ctx.image_row([src], PROFILE_IMAGE_HEIGHT, 1)),
    );

    let name = info.full_name();
    let name = if name.is_empty() {
        warn!(section = "header", reason = "blank name", "rendering header with placeholder");
        ctx.t.t("document.untitled")
    } else {
        name
    };
    block.push_opt(ctx.text(&name, FontFace::Bold, NAME_SIZE, Rgb::TEXT));
    block.push_opt(ctx.text(
        &ctx.t.t(info.availability.label_key()),
        FontFace::Bold,
        ctx.body(),
        Rgb::ACCENT,
    ));

    let phone = info.phone.as_deref().unwrap_or_default();
    block.push_opt(ctx.text(
        &join_present(&[info.email.as_str(), info.location.as_str(), phone], "  |  "),
        FontFace::Regular,
        ctx.body(),
        Rgb::MUTED,
    ));
    let links = [&info.linkedin, &info.github, &info.website]
        .into_iter()
        .filter_map(|l| l.as_deref())
        .collect::<Vec<_>>();
    block.push_opt(ctx.text(&join_present(&links, "  |  "), FontFace::Regular, SMALL_SIZE, Rgb::MUTED));
    block.push(Element::Rule {
        color: Rgb::ACCENT,
        thickness: 2.0,
    });
    block.push(Element::Gap(6.0));
    block
}

/// Description paragraph, then the interests row.
pub fn about_blocks(ctx: &DocumentContext<'_>, info: &PersonalInfo) -> Vec<Block> {
    let mut blocks = Vec::new();

    let mut paragraph = Block::new(BlockKind::Paragraph, false);
    paragraph.push_opt(ctx.text(&info.description, FontFace::Regular, ctx.body(), Rgb::TEXT));
    if !paragraph.is_empty() {
        paragraph.push(Element::Gap(6.0));
        blocks.push(paragraph);
    }

    let tags = Element::tags(
        info.interests
            .iter()
            .map(|i| (i.clone(), Rgb::TRACK, Rgb::TEXT))
            .collect(),
        TAG_SIZE,
        ctx.width(),
    );
    if let Some(tags) = tags {
        let mut interests = Block::new(BlockKind::Entry, true);
        interests.push_opt(ctx.subheading("sections.interests"));
        interests.push(tags);
        interests.push(Element::Gap(ENTRY_GAP));
        blocks.push(interests);
    }
    blocks
}

pub fn experience_block(ctx: &DocumentContext<'_>, exp: &Experience) -> Option<Block> {
    guarded("experience", exp.id, || {
        let t = ctx.t;
        let mut block = Block::new(BlockKind::Entry, true);

        block.push_opt(ctx.image_row(exp.logos.iter().map(String::as_str), LOGO_HEIGHT, 2));
        let name = entry_name(ctx, "experience", exp.id, &exp.mission_name);
        block.push_opt(ctx.text(&name, FontFace::Bold, ENTRY_TITLE_SIZE, Rgb::TEXT));
        block.push_opt(ctx.text(
            &join_present(&[exp.client.as_str(), exp.location.as_str()], " - "),
            FontFace::Regular,
            ctx.body(),
            Rgb::ACCENT,
        ));

        let mut dates = date_range(&exp.start_date, exp.end_date.as_deref(), t.t("experience.present"));
        if exp.current {
            dates = format!("{dates}  ({})", t.t("experience.current"));
        }
        block.push_opt(ctx.text(&dates, FontFace::Regular, SMALL_SIZE, Rgb::MUTED));
        block.push_opt(ctx.text(&exp.summary, FontFace::Regular, ctx.body(), Rgb::TEXT));

        if !exp.objectives.is_empty() {
            block.push_opt(ctx.subheading("experience.objectives"));
            ctx.bullets(&mut block, &exp.objectives);
        }
        if !exp.details.is_empty() {
            block.push_opt(ctx.subheading("experience.details"));
            ctx.bullets(&mut block, &exp.details);
        }
        if let Some(team) = exp.team.as_deref().filter(|t| !t.trim().is_empty()) {
            block.push_opt(ctx.text(
                &format!("{}: {}", t.t("experience.team"), team.trim()),
                FontFace::Regular,
                ctx.body(),
                Rgb::TEXT,
            ));
        }
        if !exp.technologies.is_empty() {
            block.push(Element::Gap(3.0));
            block.push_opt(technology_tags(ctx, &exp.technologies, false));
        }
        if !exp.tools.is_empty() {
            block.push_opt(ctx.text(
                &format!("{}: {}", t.t("experience.tools"), exp.tools.join(", ")),
                FontFace::Regular,
                SMALL_SIZE,
                Rgb::MUTED,
            ));
        }
        if let Some(condition) = exp.visible_end_condition() {
            block.push_opt(ctx.text(
                &format!("{}: {condition}", t.t("experience.endCondition")),
                FontFace::Regular,
                SMALL_SIZE,
                Rgb::MUTED,
            ));
        }
        block.push(Element::Gap(ENTRY_GAP));
        Some(block)
    })
}

pub fn formation_block(ctx: &DocumentContext<'_>, formation: &Formation) -> Option<Block> {
    guarded("education", formation.id, || {
        let mut block = Block::new(BlockKind::Entry, true);
        let name = entry_name(ctx, "education", formation.id, &formation.program);
        block.push_opt(ctx.text(&name, FontFace::Bold, ENTRY_TITLE_SIZE, Rgb::TEXT));
        block.push_opt(ctx.text(
            &join_present(&[formation.school.as_str(), formation.location.as_str()], " - "),
            FontFace::Regular,
            ctx.body(),
            Rgb::ACCENT,
        ));
        block.push_opt(ctx.text(
            &date_range(
                &formation.start_date,
                formation.end_date.as_deref(),
                ctx.t.t("experience.present"),
            ),
            FontFace::Regular,
            SMALL_SIZE,
            Rgb::MUTED,
        ));
        if !formation.diplomas.is_empty() {
            block.push_opt(ctx.subheading("education.diplomas"));
            ctx.bullets(&mut block, &formation.diplomas);
        }
        block.push(Element::Gap(ENTRY_GAP));
        Some(block)
    })
}

/// A skill category: level bars for the primary categories, a tag row otherwise.
pub fn skill_category_block(
    ctx: &DocumentContext<'_>,
    index: usize,
    category: &CompetenceCategory,
    with_bars: bool,
) -> Option<Block> {
    guarded("skills", index as u32, || {
        if category.competences.is_empty() {
            warn!(section = "skills", entry = index, reason = "no competences", "skipping category");
            return None;
        }
        let mut block = Block::new(BlockKind::Entry, true);
        let title = category.display_title();
        let title = if title.is_empty() {
            ctx.t.t("document.untitled")
        } else {
            title
        };
        block.push_opt(ctx.text(&title, FontFace::Bold, ENTRY_TITLE_SIZE, Rgb::TEXT));

        if with_bars {
            for competence in &category.competences {
                block.push(Element::Bar {
                    label: competence.label.trim().to_string(),
                    level: ctx.t.t(&level_label_key(competence)),
                    percent: skill_percentage(competence.level),
                    color: Rgb::hex_or(level_swatch(competence.level).background, Rgb::MUTED),
                    size: ctx.body(),
                });
                block.push_opt(ctx.indented(&competence.description, SMALL_SIZE, Rgb::MUTED));
            }
        } else {
            block.push_opt(Element::tags(
                category
                    .competences
                    .iter()
                    .map(|c| {
                        let swatch = level_swatch(c.level);
                        (
                            c.label.clone(),
                            Rgb::hex_or(swatch.background, Rgb::MUTED),
                            Rgb::WHITE,
                        )
                    })
                    .collect(),
                TAG_SIZE,
                ctx.width(),
            ));
        }
        block.push(Element::Gap(ENTRY_GAP));
        Some(block)
    })
}

/// A full project card. Never split across pages.
pub fn project_block(ctx: &DocumentContext<'_>, project: &Project, image_limit: usize) -> Option<Block> {
    guarded("projects", project.id, || {
        let t = ctx.t;
        let mut block = Block::new(BlockKind::Entry, true);
        let name = entry_name(ctx, "projects", project.id, &project.name);
        block.push_opt(ctx.text(&name, FontFace::Bold, ENTRY_TITLE_SIZE, Rgb::TEXT));

        let status_color = document_status_color(&project.status);
        let mut badges = vec![(t.t(&project.status.label_key()), status_color, Rgb::WHITE)];
        badges.extend(
            project
                .categories
                .iter()
                .map(|c| (t.t(&c.label_key()), Rgb::TRACK, Rgb::TEXT)),
        );
        block.push_opt(Element::tags(badges, TAG_SIZE, ctx.width()));
        block.push_opt(ctx.text(
            &format!(
                "{}  |  {}: {}",
                date_range(&project.start_date, project.end_date.as_deref(), t.t("projects.ongoing")),
                t.t("document.status"),
                t.t(&project.status.label_key()),
            ),
            FontFace::Regular,
            SMALL_SIZE,
            Rgb::MUTED,
        ));
        block.push_opt(ctx.text(&project.description, FontFace::Regular, ctx.body(), Rgb::TEXT));

        if project.sub_projects.is_empty() {
            let technologies = all_technologies(project);
            if !technologies.is_empty() {
                block.push_opt(ctx.subheading("projects.technologies"));
                block.push_opt(technology_tags(ctx, &technologies, false));
            }
        } else {
            block.push_opt(ctx.text(
                &format!("{} ({})", t.t("projects.subProjects"), project.sub_projects.len()),
                FontFace::Bold,
                ctx.body(),
                Rgb::TEXT,
            ));
            for sub in &project.sub_projects {
                let sub_name = entry_name(ctx, "projects", sub.id, &sub.name);
                let line = if sub.description.trim().is_empty() {
                    format!("• {sub_name}")
                } else {
                    format!("• {sub_name}: {}", sub.description.trim())
                };
                block.push_opt(ctx.indented(&line, ctx.body(), Rgb::TEXT));
                if !sub.technologies.is_empty() {
                    block.push_opt(technology_tags(ctx, &sub.technologies, true));
                }
            }
        }

        let images = all_images(project);
        block.push(Element::Gap(3.0));
        block.push_opt(ctx.image_row(
            images.iter().map(|i| i.url.as_str()),
            PROJECT_IMAGE_HEIGHT,
            image_limit,
        ));
        block.push(Element::Gap(ENTRY_GAP));
        Some(block)
    })
}

/// A recommendation block. Skipped when there is no text to show.
pub fn recommendation_block(ctx: &DocumentContext<'_>, rec: &Recommendation) -> Option<Block> {
    guarded("recommendations", rec.id, || {
        let text = rec.display_text(ctx.t.language()).trim();
        if text.is_empty() {
            warn!(section = "recommendations", entry = rec.id, reason = "no text", "skipping entry");
            return None;
        }
        let mut block = Block::new(BlockKind::Entry, true);
        let author = entry_name(ctx, "recommendations", rec.id, &rec.author);
        block.push_opt(ctx.text(&author, FontFace::Bold, ENTRY_TITLE_SIZE, Rgb::TEXT));
        block.push_opt(ctx.text(
            &join_present(&[rec.role.as_str(), rec.company.as_str()], " - "),
            FontFace::Regular,
            SMALL_SIZE,
            Rgb::ACCENT,
        ));
        block.push_opt(ctx.indented(&format!("“{text}”"), ctx.body(), Rgb::TEXT));
        block.push(Element::Gap(ENTRY_GAP));
        Some(block)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::font_metrics::a4_page_config;
    use crate::document::images::decode;
    use crate::document::images::tests::make_png;
    use crate::models::{ImageKind, Language, ProjectImage, SubProject};
    use crate::projects::filter::tests::make_project;
    use crate::sections::tests::{bundled, make_translator};

    fn all_text(block: &Block) -> String {
        block.text_lines().join(" ")
    }

    fn make_sub(id: u32, name: &str, technologies: &[&str]) -> SubProject {
        SubProject {
            id,
            name: name.to_string(),
            start_date: String::new(),
            end_date: None,
            description: "firmware".to_string(),
            technologies: technologies.iter().map(|t| t.to_string()).collect(),
            tools: vec![],
            updates: vec![],
            images: vec![],
        }
    }

    #[tokio::test]
    async fn test_project_without_sub_projects_lists_technologies() {
        let t = make_translator(Language::En).await;
        let config = a4_page_config();
        let images = ImageCatalog::empty();
        let ctx = DocumentContext { t: &t, config: &config, images: &images };

        let mut project = make_project(1, ProjectStatus::Completed, &[]);
        project.technologies = vec!["Rust".to_string(), "Angular".to_string()];
        project.description = String::new();
        let block = project_block(&ctx, &project, PRIMARY_IMAGE_LIMIT).unwrap();
        assert!(block.keep_together);
        let text = all_text(&block);
        assert!(text.contains("Angular"));
        assert!(!text.contains(&t.t("projects.subProjects")));
    }

    #[tokio::test]
    async fn test_project_with_sub_projects_shows_breakdown() {
        let t = make_translator(Language::En).await;
        let config = a4_page_config();
        let images = ImageCatalog::empty();
        let ctx = DocumentContext { t: &t, config: &config, images: &images };

        let mut project = make_project(2, ProjectStatus::InProgress, &[]);
        project.technologies = vec!["Cobol".to_string()];
        project.sub_projects = vec![make_sub(1, "Sensor board", &["KiCad"]), make_sub(2, "", &[])];
        let block = project_block(&ctx, &project, PRIMARY_IMAGE_LIMIT).unwrap();
        let text = all_text(&block);
        assert!(text.contains("• Sensor board: firmware"));
        assert!(text.contains("KiCad"));
        assert!(text.contains(&t.t("document.untitled")));
        assert!(!text.contains("Cobol"));
    }

    #[tokio::test]
    async fn test_project_images_respect_limit_and_catalog() {
        let t = make_translator(Language::En).await;
        let config = a4_page_config();
        let mut images = ImageCatalog::empty();
        for name in ["/a.png", "/b.png", "/c.png"] {
            images.insert(name, decode(name, &make_png(40, 30)).unwrap());
        }
        let ctx = DocumentContext { t: &t, config: &config, images: &images };

        let mut project = make_project(3, ProjectStatus::Started, &[]);
        project.images = ["/a.png", "/missing.png", "/b.png", "/c.png"]
            .into_iter()
            .map(|url| ProjectImage { url: url.to_string(), kind: ImageKind::Photo })
            .collect();

        let block = project_block(&ctx, &project, ADDITIONAL_IMAGE_LIMIT).unwrap();
        let rows: Vec<usize> = block
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Images { images, .. } => Some(images.len()),
                _ => None,
            })
            .collect();
        assert_eq!(rows, vec![2]);
    }

    #[tokio::test]
    async fn test_blank_experience_name_gets_placeholder() {
        let t = make_translator(Language::Fr).await;
        let config = a4_page_config();
        let images = ImageCatalog::empty();
        let ctx = DocumentContext { t: &t, config: &config, images: &images };

        let mut exp = bundled(Language::Fr).experiences[0].clone();
        exp.mission_name = "  ".to_string();
        exp.current = true;
        exp.end_condition = Some("Fin de budget".to_string());
        let block = experience_block(&ctx, &exp).unwrap();
        let text = all_text(&block);
        assert!(text.contains(&t.t("document.untitled")));
        assert!(!text.contains("Fin de budget"));
    }

    #[tokio::test]
    async fn test_empty_recommendation_is_skipped() {
        let t = make_translator(Language::En).await;
        let config = a4_page_config();
        let images = ImageCatalog::empty();
        let ctx = DocumentContext { t: &t, config: &config, images: &images };

        let mut rec = bundled(Language::En).recommendations[0].clone();
        rec.text = " ".to_string();
        assert!(recommendation_block(&ctx, &rec).is_none());
    }

    #[test]
    fn test_unknown_status_uses_neutral_color() {
        assert_eq!(
            document_status_color(&ProjectStatus::Unknown("paused".to_string())),
            Rgb(0x8b, 0x5c, 0xf6)
        );
        assert_eq!(document_status_color(&ProjectStatus::Completed), Rgb(0x10, 0xb9, 0x81));
    }
}
