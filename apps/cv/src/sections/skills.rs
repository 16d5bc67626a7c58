use crate::models::{Competence, CompetenceCategory};
use crate::projects::{level_swatch, skill_percentage, technology_family};
use crate::sections::{el, entrance, section_shell, RenderContext, RenderError, SectionId, ViewNode};

pub fn level_label_key(competence: &Competence) -> String {
    match competence.level {
        Some(level) => format!("skills.{}", level.key()),
        None => "skills.unknown".to_string(),
    }
}

fn skill_item(ctx: &RenderContext<'_>, competence: &Competence) -> ViewNode {
    let level = level_swatch(competence.level);
    let tint = technology_family(&competence.label).swatch();
    let label = ctx.t.t(&level_label_key(competence));

    el("div")
        .class("skill-item")
        .style("background-color", tint.background)
        .child(el("h4").class("skill-label").text(competence.label.clone()))
        .child(
            el("span")
                .class("skill-level")
                .attr("data-level", label.clone())
                .style("color", level.foreground)
                .text(label),
        )
        .child(
            el("div").class("skill-bar").child(
                el("div")
                    .class("skill-bar-fill")
                    .style("background-color", level.background)
                    .style("width", format!("{}%", skill_percentage(competence.level))),
            ),
        )
        .maybe((!competence.description.trim().is_empty()).then(|| {
            el("p")
                .class("skill-details")
                .text(competence.description.clone())
        }))
}

fn category_card(ctx: &RenderContext<'_>, index: usize, category: &CompetenceCategory) -> ViewNode {
    let card = el("div")
        .class("skill-category card")
        .child(el("h3").text(category.display_title()))
        .children(category.competences.iter().map(|c| skill_item(ctx, c)));
    entrance(card, &format!("skill-category-{index}"), ctx.animations)
}

pub fn render(ctx: &RenderContext<'_>) -> Result<ViewNode, RenderError> {
    let grid = el("div").class("skills-grid").children(
        ctx.data
            .competence_categories
            .iter()
            .enumerate()
            .map(|(index, category)| category_card(ctx, index, category)),
    );
    Ok(section_shell(SectionId::Skills, ctx.t.t("sections.technicalSkills")).child(grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, SkillLevel};
    use crate::sections::tests::{bundled, make_translator};
    use crate::sections::{AnimationLatch, ProjectView};

    #[tokio::test]
    async fn test_bars_follow_level_percentages() {
        let mut data = (*bundled(Language::Fr)).clone();
        data.competence_categories = vec![CompetenceCategory {
            title: "Back".to_string(),
            subtitle: "end".to_string(),
            competences: vec![
                Competence {
                    label: "C#".to_string(),
                    level: Some(SkillLevel::Advanced),
                    description: String::new(),
                },
                Competence {
                    label: "Elixir".to_string(),
                    level: None,
                    description: "Side projects".to_string(),
                },
            ],
        }];
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
        let widths: Vec<Option<&str>> = node
            .find_by_class("skill-bar-fill")
            .iter()
            .map(|n| n.style_value("width"))
            .collect();
        assert_eq!(widths, vec![Some("90%"), Some("60%")]);
        assert_eq!(node.find_by_class("skill-details").len(), 1);
        assert!(node.text_content().contains("Back end"));
    }
}
