use tracing::warn;

use crate::models::Recommendation;
use crate::sections::{
    collapsible, el, entrance, section_shell, RenderContext, RenderError, SectionId, ViewNode,
};

/// Texts longer than this are cut to an excerpt with the full text behind a toggle.
const EXCERPT_CHARS: usize = 280;

fn excerpt(text: &str) -> Option<String> {
    if text.chars().count() <= EXCERPT_CHARS {
        return None;
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    let cut = match cut.rfind(' ') {
        Some(pos) => cut[..pos].to_string(),
        None => cut,
    };
    Some(format!("{}…", cut.trim_end()))
}

fn recommendation_card(ctx: &RenderContext<'_>, rec: &Recommendation) -> Option<ViewNode> {
    let text = rec.display_text(ctx.t.language()).trim();
    if text.is_empty() {
        warn!(section = "recommendations", entry = rec.id, "skipping recommendation without text");
        return None;
    }

    let author = el("div")
        .class("recommendation-author")
        .maybe(rec.logo.as_ref().map(|src| {
            el("img")
                .class("company-logo")
                .attr("src", src.clone())
                .attr("alt", rec.company.clone())
        }))
        .child(el("h3").text(rec.author.clone()))
        .child(el("p").class("role").text(format!("{} - {}", rec.role, rec.company)))
        .maybe(rec.link.as_ref().map(|href| {
            el("a")
                .class("profile-link web-only")
                .attr("href", href.clone())
                .attr("target", "_blank")
                .attr("rel", "noopener noreferrer")
                .text(ctx.t.t("recommendations.viewProfile"))
        }));

    let body = match excerpt(text) {
        Some(short) => el("div")
            .child(el("blockquote").class("excerpt web-only").text(short))
            .child(collapsible(
                &format!("recommendation-{}-full", rec.id),
                ctx.t.t("recommendations.readMore"),
                el("blockquote")
                    .class("pdf-recommendation-details")
                    .text(text.to_string()),
            )),
        None => el("blockquote").class("recommendation-text").text(text.to_string()),
    };

    let card = el("article")
        .id(format!("recommendation-{}", rec.id))
        .class("recommendation card")
        .child(author)
        .child(body);
    Some(entrance(card, &format!("recommendation-{}", rec.id), ctx.animations))
}

pub fn render(ctx: &RenderContext<'_>) -> Result<ViewNode, RenderError> {
    let list = el("div").class("recommendation-list").children(
        ctx.data
            .recommendations
            .iter()
            .filter_map(|rec| recommendation_card(ctx, rec)),
    );
    Ok(section_shell(SectionId::Recommendations, ctx.t.t("sections.recommendations")).child(list))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use crate::sections::tests::{bundled, make_translator};
    use crate::sections::{AnimationLatch, ProjectView};

    fn make_rec(id: u32, text: &str, translated: Option<&str>) -> Recommendation {
        Recommendation {
            id,
            author: "Sam".to_string(),
            role: "Lead".to_string(),
            company: "Acme".to_string(),
            link: None,
            text: text.to_string(),
            translated: translated.map(str::to_string),
            logo: None,
        }
    }

    #[test]
    fn test_excerpt_cuts_on_word_boundary() {
        assert_eq!(excerpt("short"), None);
        let long = "word ".repeat(100);
        let cut = excerpt(&long).unwrap();
        assert!(cut.ends_with("word…"));
        assert!(cut.chars().count() <= EXCERPT_CHARS + 1);
    }

    #[tokio::test]
    async fn test_french_prefers_translation_and_empty_is_skipped() {
        let mut data = (*bundled(Language::Fr)).clone();
        data.recommendations = vec![
            make_rec(1, "Great work", Some("Super travail")),
            make_rec(2, "   ", None),
        ];
        let t = make_translator(Language::Fr).await;
        let latch = AnimationLatch::new();
        let projects = ProjectView::default();
        let ctx = RenderContext {
            data: &data,
            t: &t,
            animations: &latch,
            projects: &projects,
        };
        let node = render(&ctx).unwrap();
        assert_eq!(node.find_by_class("recommendation").len(), 1);
        assert!(node.text_content().contains("Super travail"));
        assert!(!node.text_content().contains("Great work"));
    }
}
