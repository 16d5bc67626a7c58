//! Document rendition: the CV laid out on fixed-size A4 pages.
//!
//! Independent of the interactive view. Content is grouped by category and
//! each group starts a page:
//!
//! 1. header, about and the first experiences;
//! 2. remaining experiences, headed "(continued)", followed by education;
//! 3. skills: the first two categories with level bars, the rest as tags;
//! 4. the first projects;
//! 5. the additional projects;
//! 6. recommendations.
//!
//! Within a group, blocks overflow onto further pages according to the rules
//! in [`paginate`].

pub mod blocks;
pub mod builders;
pub mod font_metrics;
pub mod images;
pub mod measure;
pub mod paginate;
pub mod pdf;

use tracing::{debug, info, warn};

use crate::i18n::Translator;
use crate::models::CvData;

use builders::{
    about_blocks, continued_title, experience_block, formation_block, header_block, project_block,
    recommendation_block, section_title, skill_category_block, DocumentContext,
    ADDITIONAL_IMAGE_LIMIT, PRIMARY_IMAGE_LIMIT,
};
use paginate::{analyze_page_fill, paginate, PageFillVerdict, PageGroup, SectionRun};

pub use font_metrics::{a4_page_config, PageConfig};
pub use images::{ImageCatalog, ImageResolver};
pub use paginate::Page;
pub use pdf::{write_pdf, DocumentInfo};

/// Experience entries on the first page.
pub const FIRST_PAGE_EXPERIENCES: usize = 2;
/// Skill categories drawn with level bars.
pub const PRIMARY_SKILL_CATEGORIES: usize = 2;
/// Projects on the first projects page.
pub const FIRST_PAGE_PROJECTS: usize = 2;

fn titled_run(ctx: &DocumentContext<'_>, title: &str, blocks: Vec<blocks::Block>) -> SectionRun {
    SectionRun {
        heading: Some(section_title(ctx, title)),
        continued: Some(continued_title(ctx, title)),
        blocks,
    }
}

fn page_groups(cv: &CvData, ctx: &DocumentContext<'_>) -> Vec<PageGroup> {
    let t = ctx.t;
    let experience_title = t.t("sections.professionalExperience");
    let (first_experiences, more_experiences) = cv
        .experiences
        .split_at(FIRST_PAGE_EXPERIENCES.min(cv.experiences.len()));

    let opening = PageGroup {
        runs: vec![
            SectionRun {
                blocks: vec![header_block(ctx, &cv.personal_info)],
                ..SectionRun::default()
            },
            titled_run(ctx, &t.t("sections.aboutMe"), about_blocks(ctx, &cv.personal_info)),
            titled_run(
                ctx,
                &experience_title,
                first_experiences
                    .iter()
                    .filter_map(|e| experience_block(ctx, e))
                    .collect(),
            ),
        ],
    };

    let continued_experience = SectionRun {
        heading: Some(continued_title(ctx, &experience_title)),
        continued: Some(continued_title(ctx, &experience_title)),
        blocks: more_experiences
            .iter()
            .filter_map(|e| experience_block(ctx, e))
            .collect(),
    };
    let education = titled_run(
        ctx,
        &t.t("sections.education"),
        cv.formations
            .iter()
            .filter_map(|f| formation_block(ctx, f))
            .collect(),
    );

    let (primary, additional) = cv
        .competence_categories
        .split_at(PRIMARY_SKILL_CATEGORIES.min(cv.competence_categories.len()));
    let skills = PageGroup {
        runs: vec![
            titled_run(
                ctx,
                &t.t("sections.technicalSkills"),
                primary
                    .iter()
                    .enumerate()
                    .filter_map(|(i, c)| skill_category_block(ctx, i, c, true))
                    .collect(),
            ),
            titled_run(
                ctx,
                &t.t("document.additionalSkills"),
                additional
                    .iter()
                    .enumerate()
                    .filter_map(|(i, c)| skill_category_block(ctx, i + primary.len(), c, false))
                    .collect(),
            ),
        ],
    };

    let (first_projects, more_projects) = cv
        .projects
        .split_at(FIRST_PAGE_PROJECTS.min(cv.projects.len()));
    let projects = PageGroup {
        runs: vec![titled_run(
            ctx,
            &t.t("projects.title"),
            first_projects
                .iter()
                .filter_map(|p| project_block(ctx, p, PRIMARY_IMAGE_LIMIT))
                .collect(),
        )],
    };
    let additional_projects = PageGroup {
        runs: vec![titled_run(
            ctx,
            &t.t("document.additionalProjects"),
            more_projects
                .iter()
                .filter_map(|p| project_block(ctx, p, ADDITIONAL_IMAGE_LIMIT))
                .collect(),
        )],
    };

    let recommendations = PageGroup {
        runs: vec![titled_run(
            ctx,
            &t.t("sections.recommendations"),
            cv.recommendations
                .iter()
                .filter_map(|r| recommendation_block(ctx, r))
                .collect(),
        )],
    };

    vec![
        opening,
        PageGroup {
            runs: vec![continued_experience, education],
        },
        skills,
        projects,
        additional_projects,
        recommendations,
    ]
}

/// Lays out the whole aggregate in the translator's language.
pub fn render(cv: &CvData, t: &Translator, images: &ImageCatalog) -> Vec<Page> {
    let config = a4_page_config();
    let ctx = DocumentContext {
        t,
        config: &config,
        images,
    };
    let pages = paginate(page_groups(cv, &ctx), &config);

    for page in &pages {
        let fill = analyze_page_fill(page, &config);
        match fill.verdict {
            PageFillVerdict::Overflow => warn!(
                page = fill.page,
                overflow = fill.overflow_fraction,
                "page content runs past the bottom margin"
            ),
            _ => debug!(page = fill.page, whitespace = fill.whitespace_fraction, verdict = ?fill.verdict, "page laid out"),
        }
    }
    info!(language = %t.language(), pages = pages.len(), "document laid out");
    pages
}

/// Lays out and serializes the aggregate as a PDF.
pub fn render_pdf(cv: &CvData, t: &Translator, images: &ImageCatalog) -> Vec<u8> {
    let pages = render(cv, t, images);
    let info = DocumentInfo {
        title: format!("CV - {}", cv.personal_info.full_name()),
        author: cv.personal_info.full_name(),
    };
    write_pdf(&pages, &a4_page_config(), &info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use crate::sections::tests::{bundled, make_translator};

    fn page_of(pages: &[Page], needle: &str) -> Option<usize> {
        pages
            .iter()
            .find(|p| p.text_lines().iter().any(|l| l.contains(needle)))
            .map(|p| p.number)
    }

    #[tokio::test]
    async fn test_sections_follow_page_order() {
        let cv = bundled(Language::Fr);
        let t = make_translator(Language::Fr).await;
        let pages = render(&cv, &t, &ImageCatalog::empty());
        assert!(pages.len() >= 4);

        let name = cv.personal_info.full_name();
        assert_eq!(page_of(&pages, &name), Some(1));

        let skills = page_of(&pages, &t.t("sections.technicalSkills")).unwrap();
        let projects = page_of(&pages, &t.t("projects.title")).unwrap();
        let recommendations = page_of(&pages, &t.t("sections.recommendations")).unwrap();
        assert!(skills > 1);
        assert!(projects > skills);
        assert!(recommendations > projects);
    }

    #[tokio::test]
    async fn test_overflow_experiences_are_marked_continued() {
        let cv = bundled(Language::En);
        assert!(cv.experiences.len() > FIRST_PAGE_EXPERIENCES);
        let t = make_translator(Language::En).await;
        let pages = render(&cv, &t, &ImageCatalog::empty());

        let third = &cv.experiences[FIRST_PAGE_EXPERIENCES].mission_name;
        let page = page_of(&pages, third).unwrap();
        assert!(page > 1);
        let continued = format!(
            "{} ({})",
            t.t("sections.professionalExperience"),
            t.t("document.continued")
        );
        let first_line = pages[page - 1].text_lines()[0].to_string();
        assert_eq!(first_line, continued);
    }

    #[tokio::test]
    async fn test_no_page_overflows_and_cards_stay_whole() {
        let cv = bundled(Language::En);
        let t = make_translator(Language::En).await;
        let pages = render(&cv, &t, &ImageCatalog::empty());
        let config = a4_page_config();
        for page in &pages {
            assert_ne!(analyze_page_fill(page, &config).verdict, PageFillVerdict::Overflow);
        }
        for project in &cv.projects {
            let holding: Vec<usize> = pages
                .iter()
                .filter(|p| {
                    p.items.iter().any(|placed| {
                        placed.block.text_lines().first().map(|l| l.contains(project.name.trim())) == Some(true)
                    })
                })
                .map(|p| p.number)
                .collect();
            assert_eq!(holding.len(), 1, "project {} split or missing", project.name);
        }
    }

    #[tokio::test]
    async fn test_render_pdf_produces_document() {
        let cv = bundled(Language::Fr);
        let t = make_translator(Language::Fr).await;
        let bytes = render_pdf(&cv, &t, &ImageCatalog::empty());
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 1000);
    }
}
