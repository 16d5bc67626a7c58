use crate::models::PersonalInfo;
use crate::sections::{el, entrance, RenderContext, RenderError, SectionId, ViewNode};

struct ContactItem {
    label_key: &'static str,
    value: String,
    href: Option<String>,
}

fn contact_items(info: &PersonalInfo) -> Vec<ContactItem> {
    let mut items = vec![
        ContactItem {
            label_key: "contact.email",
            value: info.email.clone(),
            href: Some(format!("mailto:{}", info.email)),
        },
        ContactItem {
            label_key: "contact.location",
            value: info.location.clone(),
            href: None,
        },
    ];
    if let Some(phone) = &info.phone {
        items.push(ContactItem {
            label_key: "contact.phone",
            value: phone.clone(),
            href: Some(format!("tel:{}", phone.replace(' ', ""))),
        });
    }
    for (label_key, link) in [
        ("contact.linkedin", &info.linkedin),
        ("contact.github", &info.github),
        ("contact.website", &info.website),
    ] {
        if let Some(url) = link {
            items.push(ContactItem {
                label_key,
                value: url.clone(),
                href: Some(url.clone()),
            });
        }
    }
    items.retain(|item| !item.value.trim().is_empty());
    items
}

fn contact_node(ctx: &RenderContext<'_>, item: ContactItem) -> ViewNode {
    let label = el("p").class("contact-label").text(ctx.t.t(item.label_key));
    match item.href {
        Some(href) => {
            let external = href.starts_with("http");
            let mut link = el("a")
                .class("contact-item")
                .attr("href", href)
                .child(label)
                .child(el("span").class("contact-value").text(item.value));
            if external {
                link = link
                    .attr("target", "_blank")
                    .attr("rel", "noopener noreferrer");
            }
            link
        }
        None => el("div")
            .class("contact-item")
            .child(label)
            .child(el("span").class("contact-value").text(item.value)),
    }
}

pub fn render(ctx: &RenderContext<'_>) -> Result<ViewNode, RenderError> {
    let info = &ctx.data.personal_info;
    let full_name = info.full_name();
    if full_name.is_empty() {
        return Err(RenderError::Missing {
            section: SectionId::Home,
            what: "person name".to_string(),
        });
    }

    let hero = el("div")
        .class("hero")
        .maybe(info.profile_image.as_ref().map(|src| {
            el("img")
                .class("profile-image")
                .attr("src", src.clone())
                .attr("alt", full_name.clone())
        }))
        .child(el("h1").class("person-name").text(full_name.clone()))
        .child(
            el("div")
                .class("availability-status")
                .attr("data-status", info.availability.label_key())
                .text(ctx.t.t(info.availability.label_key())),
        )
        .child(
            el("a")
                .class("pdf-buttons download-cv web-only")
                .attr("href", "#download-cv")
                .text(ctx.t.t("navigation.downloadCv")),
        );

    let about = el("div")
        .class("about-card")
        .child(el("h2").text(ctx.t.t("sections.aboutMe")))
        .maybe(
            (!info.description.trim().is_empty())
                .then(|| el("p").class("description").text(info.description.clone())),
        )
        .maybe((!info.interests.is_empty()).then(|| {
            el("div")
                .class("interests")
                .child(el("h3").text(ctx.t.t("sections.interests")))
                .children(
                    info.interests
                        .iter()
                        .map(|interest| el("span").class("interest").text(interest.clone())),
                )
        }));

    let contact = el("div")
        .class("contact-card")
        .child(el("h3").text(ctx.t.t("contact.title")))
        .children(
            contact_items(info)
                .into_iter()
                .map(|item| contact_node(ctx, item)),
        );

    Ok(el("section")
        .id(SectionId::Home.anchor())
        .class("cv-section home")
        .child(entrance(hero, "home-hero", ctx.animations))
        .child(entrance(
            el("div").class("home-grid").child(about).child(contact),
            "home-details",
            ctx.animations,
        )))
}
