use crate::models::Formation;
use crate::sections::{
    date_range, el, entrance, section_shell, RenderContext, RenderError, SectionId, ViewNode,
};

fn formation_card(ctx: &RenderContext<'_>, formation: &Formation) -> ViewNode {
    let card = el("article")
        .class("education-item card")
        .maybe(formation.image.as_ref().map(|src| {
            el("img")
                .class("school-logo")
                .attr("src", src.clone())
                .attr("alt", formation.school.clone())
                .attr("loading", "lazy")
        }))
        .child(el("h3").class("education-title").text(formation.program.clone()))
        .child(
            el("p")
                .class("education-school")
                .text(format!("{} - {}", formation.school, formation.location)),
        )
        .child(el("span").class("education-date").text(date_range(
            &formation.start_date,
            formation.end_date.as_deref(),
            ctx.t.t("experience.present"),
        )))
        .maybe((!formation.diplomas.is_empty()).then(|| {
            el("div")
                .class("diplomas")
                .child(el("h4").text(ctx.t.t("education.diplomas")))
                .child(el("ul").children(
                    formation
                        .diplomas
                        .iter()
                        .map(|d| el("li").text(d.clone())),
                ))
        }));
    entrance(card, &format!("education-{}", formation.id), ctx.animations)
}

pub fn render(ctx: &RenderContext<'_>) -> Result<ViewNode, RenderError> {
    let list = el("div")
        .class("education-list")
        .children(ctx.data.formations.iter().map(|f| formation_card(ctx, f)));
    Ok(section_shell(SectionId::Education, ctx.t.t("sections.education")).child(list))
}
