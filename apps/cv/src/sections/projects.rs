use crate::models::{CategoryFilter, Project, ProjectCategory, ProjectStatus, StatusFilter, SubProject};
use crate::projects::{
    all_images, all_technologies, category_swatch, filter_and_sort, sort_technologies_by_priority,
    status_swatch, technology_family,
};
use crate::sections::{
    collapsible, date_range, el, entrance, section_shell, tag_list, RenderContext, RenderError,
    SectionId, ViewNode,
};

fn filter_bar(ctx: &RenderContext<'_>) -> ViewNode {
    let t = ctx.t;
    let view = ctx.projects;

    let mut status_buttons = vec![filter_button(
        "status",
        "all",
        t.t("projects.filterAll"),
        view.status == StatusFilter::All,
    )];
    for status in ProjectStatus::KNOWN {
        let active = view.status == StatusFilter::Only(status.clone());
        status_buttons.push(filter_button("status", status.key(), t.t(&status.label_key()), active));
    }

    let mut category_buttons = vec![filter_button(
        "category",
        "all",
        t.t("projects.categories.all"),
        view.category == CategoryFilter::All,
    )];
    for category in ProjectCategory::ALL {
        let active = view.category == CategoryFilter::Only(category);
        category_buttons.push(filter_button(
            "category",
            category.key(),
            t.t(&category.label_key()),
            active,
        ));
    }

    el("div")
        .class("project-filters web-only")
        .child(el("h3").text(t.t("projects.filterByStatus")))
        .child(el("div").attr("role", "group").children(status_buttons))
        .child(el("h3").text(t.t("projects.filterByCategory")))
        .child(el("div").attr("role", "group").children(category_buttons))
}

fn filter_button(kind: &str, value: &str, label: String, active: bool) -> ViewNode {
    let button = el("button")
        .class("filter-button")
        .attr(&format!("data-filter-{kind}"), value)
        .attr("aria-pressed", active.to_string())
        .text(label);
    if active {
        button.class("active")
    } else {
        button
    }
}

fn status_badge(ctx: &RenderContext<'_>, status: &ProjectStatus) -> ViewNode {
    let swatch = status_swatch(status);
    el("span")
        .class("status-badge")
        .attr("data-status", status.key())
        .style("background-color", swatch.background)
        .style("color", swatch.foreground)
        .text(ctx.t.t(&status.label_key()))
}

fn category_badges(ctx: &RenderContext<'_>, categories: &[ProjectCategory]) -> Option<ViewNode> {
    if categories.is_empty() {
        return None;
    }
    Some(el("div").class("project-categories").children(categories.iter().map(|c| {
        let swatch = category_swatch(*c);
        el("span")
            .class("category-badge")
            .style("background-color", swatch.background)
            .style("color", swatch.foreground)
            .text(ctx.t.t(&c.label_key()))
    })))
}

fn technology_badges(technologies: &[String]) -> Option<ViewNode> {
    if technologies.is_empty() {
        return None;
    }
    Some(el("ul").class("technologies").children(
        sort_technologies_by_priority(technologies).into_iter().map(|tech| {
            el("li")
                .class("tag technology")
                .style("background-color", technology_family(&tech).color())
                .text(tech)
        }),
    ))
}

fn sub_project_node(sub: &SubProject) -> ViewNode {
    el("div")
        .class("sub-project-pdf")
        .child(el("h5").text(sub.name.clone()))
        .maybe(
            (!sub.description.trim().is_empty())
                .then(|| el("p").text(sub.description.clone())),
        )
        .maybe((!sub.technologies.is_empty()).then(|| tag_list("technologies", &sub.technologies)))
}

fn project_card(ctx: &RenderContext<'_>, project: &Project) -> ViewNode {
    let t = ctx.t;
    let images = all_images(project);

    let mut card = el("article")
        .id(format!("project-{}", project.id))
        .class("project-card card")
        .attr("data-project-id", project.id.to_string())
        .maybe(images.first().map(|image| {
            el("img")
                .class("project-cover")
                .attr("src", image.url.clone())
                .attr("alt", project.name.clone())
                .attr("loading", "lazy")
        }))
        .child(el("h3").class("project-title").text(project.name.clone()))
        .child(status_badge(ctx, &project.status))
        .maybe(category_badges(ctx, &project.categories))
        .child(el("span").class("project-date").text(date_range(
            &project.start_date,
            project.end_date.as_deref(),
            t.t("projects.ongoing"),
        )))
        .maybe(
            (!project.description.trim().is_empty())
                .then(|| el("p").class("line-clamp-3").text(project.description.clone())),
        );

    if project.sub_projects.is_empty() {
        card = card.maybe(technology_badges(&all_technologies(project)));
    } else {
        card = card.child(collapsible(
            &format!("project-{}-details", project.id),
            t.t("projects.showDetails"),
            el("div")
                .class("pdf-project-details")
                .child(el("h4").text(format!(
                    "{} ({})",
                    t.t("projects.subProjects"),
                    project.sub_projects.len()
                )))
                .children(project.sub_projects.iter().map(sub_project_node)),
        ));
    }

    entrance(card, &format!("project-{}", project.id), ctx.animations)
}

fn project_modal(ctx: &RenderContext<'_>, project: &Project) -> ViewNode {
    let t = ctx.t;
    let selection = &ctx.projects.selection;
    let images = all_images(project);

    let gallery = (!images.is_empty()).then(|| {
        el("div")
            .class("project-images")
            .child(el("h3").text(t.t("projects.images")))
            .children(images.iter().enumerate().map(|(index, image)| {
                let thumb = el("img")
                    .class("project-thumb")
                    .attr("src", image.url.clone())
                    .attr("data-kind", format!("{:?}", image.kind).to_lowercase())
                    .attr("data-index", index.to_string());
                if selection.image_index() == Some(index) {
                    thumb.class("selected")
                } else {
                    thumb
                }
            }))
    });

    let lightbox = selection.current_image(project).map(|image| {
        el("div")
            .class("image-lightbox")
            .child(el("button").class("image-nav prev").attr("data-direction", "prev"))
            .child(el("img").attr("src", image.url.clone()).attr("alt", project.name.clone()))
            .child(el("button").class("image-nav next").attr("data-direction", "next"))
    });

    el("div")
        .class("project-modal web-only")
        .attr("role", "dialog")
        .attr("aria-modal", "true")
        .child(el("button").class("modal-close").attr("data-modal-close", "true"))
        .child(el("h2").text(project.name.clone()))
        .child(el("span").class("project-date").text(project.start_date.clone()))
        .child(status_badge(ctx, &project.status))
        .maybe((!project.description.trim().is_empty()).then(|| {
            el("div")
                .class("project-description")
                .child(el("h3").text(t.t("projects.description")))
                .child(el("p").text(project.description.clone()))
        }))
        .maybe(technology_badges(&all_technologies(project)).map(|badges| {
            el("div")
                .child(el("h3").text(t.t("projects.technologies")))
                .child(badges)
        }))
        .maybe((!project.sub_projects.is_empty()).then(|| {
            el("div")
                .class("sub-projects")
                .child(el("h3").text(format!(
                    "{} ({})",
                    t.t("projects.subProjects"),
                    project.sub_projects.len()
                )))
                .children(project.sub_projects.iter().map(sub_project_node))
        }))
        .maybe(gallery)
        .maybe(lightbox)
}

pub fn render(ctx: &RenderContext<'_>) -> Result<ViewNode, RenderError> {
    let t = ctx.t;
    let visible = filter_and_sort(&ctx.data.projects, &ctx.projects.status, &ctx.projects.category);
    let count = visible.len();
    let count_label = if count == 1 {
        t.t("projects.projectFound")
    } else {
        t.t("projects.projectsFound")
    };

    let body = if visible.is_empty() {
        el("p").class("no-projects").text(t.t("projects.noProjects"))
    } else {
        el("div")
            .class("project-grid")
            .children(visible.iter().map(|p| project_card(ctx, p)))
    };

    let modal = ctx
        .projects
        .selection
        .project_id()
        .and_then(|id| visible.iter().find(|p| p.id == id))
        .map(|p| project_modal(ctx, p));

    Ok(section_shell(SectionId::Projects, t.t("projects.title"))
        .child(el("p").class("section-subtitle").text(t.t("projects.subtitle")))
        .child(filter_bar(ctx))
        .child(
            el("p")
                .class("project-count web-only")
                .text(format!("{count} {count_label}")),
        )
        .child(body)
        .maybe(modal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageKind, Language, ProjectImage};
    use crate::projects::filter::tests::make_project;
    use crate::projects::selection::Direction;
    use crate::sections::tests::{bundled, make_translator};
    use crate::sections::{AnimationLatch, ProjectView};

    async fn render_with(projects: Vec<Project>, view: ProjectView) -> ViewNode {
        let mut data = (*bundled(Language::En)).clone();
        data.projects = projects;
        let t = make_translator(Language::En).await;
        let latch = AnimationLatch::new();
        let ctx = RenderContext {
            data: &data,
            t: &t,
            animations: &latch,
            projects: &view,
        };
        render(&ctx).unwrap()
    }

    fn card_ids(node: &ViewNode) -> Vec<String> {
        node.find_by_class("project-card")
            .iter()
            .filter_map(|n| n.attr_value("data-project-id").map(str::to_string))
            .collect()
    }

    #[tokio::test]
    async fn test_grid_is_filtered_and_sorted() {
        let projects = vec![
            make_project(1, ProjectStatus::Completed, &[ProjectCategory::Wood]),
            make_project(2, ProjectStatus::InProgress, &[ProjectCategory::Wood]),
            make_project(3, ProjectStatus::InProgress, &[ProjectCategory::Informatics]),
        ];
        let node = render_with(projects.clone(), ProjectView::default()).await;
        assert_eq!(card_ids(&node), vec!["3", "2", "1"]);

        let view = ProjectView {
            category: CategoryFilter::Only(ProjectCategory::Wood),
            ..ProjectView::default()
        };
        let node = render_with(projects, view).await;
        assert_eq!(card_ids(&node), vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_empty_result_shows_message() {
        let view = ProjectView {
            status: StatusFilter::Only(ProjectStatus::Archived),
            ..ProjectView::default()
        };
        let node = render_with(vec![make_project(1, ProjectStatus::Started, &[])], view).await;
        assert_eq!(node.find_by_class("no-projects").len(), 1);
    }

    #[tokio::test]
    async fn test_modal_follows_selection() {
        let mut project = make_project(9, ProjectStatus::Completed, &[]);
        project.images = vec![
            ProjectImage {
                url: "/a.png".to_string(),
                kind: ImageKind::Web,
            },
            ProjectImage {
                url: "/b.png".to_string(),
                kind: ImageKind::Mobile,
            },
        ];
        let mut view = ProjectView::default();
        view.selection.open(&project);
        view.selection.select_image(&project, 0);
        view.selection.navigate(&project, Direction::Prev);

        let node = render_with(vec![project], view).await;
        let modal = node.find_by_class("project-modal");
        assert_eq!(modal.len(), 1);
        let lightbox = node.find_by_class("image-lightbox");
        assert_eq!(lightbox[0].children[1].attr_value("src"), Some("/b.png"));
    }
}
