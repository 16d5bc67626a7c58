use crate::models::Experience;
use crate::projects::{sort_technologies_by_priority, technology_family};
use crate::sections::{
    collapsible, date_range, el, entrance, section_shell, tag_list, RenderContext, RenderError,
    SectionId, ViewNode,
};

fn technology_badges(technologies: &[String]) -> ViewNode {
    el("ul").class("technologies").children(
        sort_technologies_by_priority(technologies)
            .into_iter()
            .map(|tech| {
                let family = technology_family(&tech);
                el("li")
                    .class("tag technology")
                    .style("background-color", family.color())
                    .text(tech)
            }),
    )
}

fn bullet_block(title: String, class: &str, items: &[String]) -> Option<ViewNode> {
    if items.is_empty() {
        return None;
    }
    Some(
        el("div")
            .class(class)
            .child(el("h4").text(title))
            .child(
                el("ul").children(items.iter().map(|item| el("li").text(item.clone()))),
            ),
    )
}

fn experience_card(ctx: &RenderContext<'_>, exp: &Experience) -> ViewNode {
    let t = ctx.t;
    let header = el("header")
        .class("experience-header")
        .child(el("h3").class("experience-title").text(exp.mission_name.clone()))
        .child(
            el("p")
                .class("experience-company")
                .text(format!("{} - {}", exp.client, exp.location)),
        )
        .child(el("span").class("experience-date").text(date_range(
            &exp.start_date,
            exp.end_date.as_deref(),
            t.t("experience.present"),
        )))
        .maybe(exp.current.then(|| {
            el("span")
                .class("badge current-mission")
                .text(t.t("experience.current"))
        }));

    let details = el("div")
        .class("experience-details")
        .maybe(bullet_block(
            t.t("experience.objectives"),
            "objectives",
            &exp.objectives,
        ))
        .maybe(bullet_block(t.t("experience.details"), "details", &exp.details))
        .maybe((!exp.tools.is_empty()).then(|| {
            el("div")
                .class("tools")
                .child(el("h4").text(t.t("experience.tools")))
                .child(tag_list("tool-list", &exp.tools))
        }))
        .maybe(exp.team.as_ref().map(|team| {
            el("p")
                .class("team")
                .text(format!("{} {}", t.t("experience.team"), team))
        }))
        .maybe(exp.visible_end_condition().map(|condition| {
            el("div")
                .class("end-condition")
                .child(el("h4").text(t.t("experience.endCondition")))
                .child(el("p").text(condition.to_string()))
        }));

    let card = el("article")
        .id(format!("experience-{}", exp.id))
        .class("experience-item card")
        .child(header)
        .maybe(
            (!exp.summary.trim().is_empty())
                .then(|| el("p").class("description").text(exp.summary.clone())),
        )
        .maybe((!exp.technologies.is_empty()).then(|| technology_badges(&exp.technologies)))
        .child(
            collapsible(
                &format!("experience-{}-details", exp.id),
                t.t("experience.showMore"),
                details,
            )
            .attr("data-testid", "expand-experience"),
        );

    entrance(card, &format!("experience-{}", exp.id), ctx.animations)
}

pub fn render(ctx: &RenderContext<'_>) -> Result<ViewNode, RenderError> {
    let list = el("div")
        .class("experience-list")
        .children(ctx.data.experiences.iter().map(|exp| experience_card(ctx, exp)));
    Ok(section_shell(SectionId::Experience, ctx.t.t("sections.professionalExperience")).child(list))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use crate::sections::tests::{bundled, make_translator};
    use crate::sections::{AnimationLatch, ProjectView};

    fn make_experience(current: bool) -> Experience {
        Experience {
            id: 42,
            mission_name: "Payments".to_string(),
            client: "Bank".to_string(),
            location: "Paris".to_string(),
            start_date: "2023-02".to_string(),
            end_date: None,
            current,
            team: Some("6 devs".to_string()),
            technologies: vec!["Docker".to_string(), "Angular".to_string()],
            tools: vec!["Jira".to_string()],
            summary: "Built the checkout.".to_string(),
            objectives: vec!["Ship v2".to_string()],
            details: vec![],
            end_condition: Some("Budget ended".to_string()),
            logos: vec![],
        }
    }

    async fn render_one(exp: Experience) -> ViewNode {
        let mut data = (*bundled(Language::En)).clone();
        data.experiences = vec![exp];
        let t = make_translator(Language::En).await;
        let latch = AnimationLatch::new();
        let projects = ProjectView::default();
        let ctx = RenderContext {
            data: &data,
            t: &t,
            animations: &latch,
            projects: &projects,
        };
        render(&ctx).unwrap()
    }

    #[tokio::test]
    async fn test_current_mission_hides_end_condition() {
        let node = render_one(make_experience(true)).await;
        assert!(node.find_by_class("end-condition").is_empty());
        assert_eq!(node.find_by_class("current-mission").len(), 1);
    }

    #[tokio::test]
    async fn test_finished_mission_shows_end_condition() {
        let mut exp = make_experience(false);
        exp.end_date = Some("2024-01".to_string());
        let node = render_one(exp).await;
        let condition = node.find_by_class("end-condition");
        assert_eq!(condition.len(), 1);
        assert!(condition[0].text_content().contains("Budget ended"));
        assert!(node.text_content().contains("2023-02 - 2024-01"));
    }

    #[tokio::test]
    async fn test_details_start_collapsed_and_technologies_sorted() {
        let node = render_one(make_experience(false)).await;
        let details = node.find_by_class("expanded-content");
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].attr_value("data-expanded"), Some("false"));
        assert_eq!(details[0].style_value("display"), Some("none"));

        let techs: Vec<String> = node
            .find_by_class("technology")
            .iter()
            .filter_map(|n| n.text.clone())
            .collect();
        assert_eq!(techs, vec!["Angular", "Docker"]);
    }
}
