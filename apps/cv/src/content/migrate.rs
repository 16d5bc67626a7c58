//! Migration from the published wire shapes to the canonical content model.
//!
//! Every normalization happens here, once:
//! - legacy project mirrors (`nomProjet`, `state`, `dateDebut`, ...) are folded
//!   into the canonical fields and only ever used as fallbacks
//! - status, category, availability, level and image kind strings become enums
//! - malformed list entries are skipped and logged instead of failing the document

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::content::raw::{
    RawCompetence, RawCompetenceCategory, RawCvData, RawExperience, RawFormation, RawImage,
    RawPersonalInfo, RawProject, RawRecommendation, RawSubProject, RawUpdate,
};
use crate::models::{
    Availability, Competence, CompetenceCategory, CvData, Experience, Formation, ImageKind,
    Language, PersonalInfo, Project, ProjectCategory, ProjectImage, ProjectStatus, ProjectUpdate,
    Recommendation, SkillLevel, SubProject,
};

/// Converts a parsed wire document into the canonical aggregate.
pub fn migrate_document(raw: RawCvData, language: Language) -> CvData {
    let experiences = parse_entries::<RawExperience>(raw.experiences, "experiences", language)
        .into_iter()
        .map(migrate_experience)
        .collect();

    let competence_categories =
        parse_entries::<RawCompetenceCategory>(raw.competence_categories, "competenceCategories", language)
            .into_iter()
            .map(|c| migrate_category(c, language))
            .collect();

    let formations = parse_entries::<RawFormation>(raw.formations, "formations", language)
        .into_iter()
        .map(migrate_formation)
        .collect();

    let projects = parse_entries::<RawProject>(raw.projets_internes, "projetsInternes", language)
        .into_iter()
        .map(|p| migrate_project(p, language))
        .collect();

    let recommendations =
        parse_entries::<RawRecommendation>(raw.recommendations, "recommendations", language)
            .into_iter()
            .map(migrate_recommendation)
            .collect();

    CvData {
        personal_info: migrate_personal_info(raw.personal_info),
        experiences,
        competence_categories,
        formations,
        projects,
        recommendations,
    }
}

/// Deserializes each entry independently; entries that fail are dropped with a warning.
fn parse_entries<T: DeserializeOwned>(values: Vec<Value>, section: &str, language: Language) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<T>(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(%language, section, index, error = %e, "skipping malformed content entry");
                None
            }
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Per-entity migrations
// ────────────────────────────────────────────────────────────────────────────

fn migrate_personal_info(raw: RawPersonalInfo) -> PersonalInfo {
    let availability = match raw.availability_status.as_deref().map(str::trim) {
        Some("available-free") => Availability::AvailableFree,
        Some("in-mission-open") => Availability::InMissionOpen,
        other => {
            warn!(value = ?other, "unrecognized availability status, defaulting to available-free");
            Availability::AvailableFree
        }
    };

    PersonalInfo {
        first_name: raw.prenom,
        last_name: raw.nom,
        age: raw.age,
        location: raw.localisation,
        phone: non_empty(raw.telephone),
        email: raw.email,
        linkedin: non_empty(raw.linkedin),
        github: non_empty(raw.github),
        website: non_empty(raw.website),
        profile_image: non_empty(raw.profile_image),
        description: raw.description,
        interests: raw.passions,
        availability,
    }
}

fn migrate_experience(raw: RawExperience) -> Experience {
    let mut end_date = non_empty(raw.date_fin);
    if raw.mission_en_cours && end_date.is_some() {
        warn!(id = raw.id, "current mission carries an end date; ignoring it");
        end_date = None;
    }

    let logos = [raw.logo1, raw.logo2]
        .into_iter()
        .filter_map(non_empty)
        .collect();

    Experience {
        id: raw.id,
        mission_name: raw.nom_de_mission,
        client: raw.context,
        location: raw.localisation,
        start_date: raw.date_debut,
        end_date,
        current: raw.mission_en_cours,
        team: non_empty(raw.equipe),
        technologies: raw.technologies,
        tools: raw.outils,
        summary: raw.mission,
        objectives: raw.objectives,
        details: raw.details_mission,
        end_condition: non_empty(raw.condition_de_fin_de_mission),
        logos,
    }
}

fn migrate_category(raw: RawCompetenceCategory, language: Language) -> CompetenceCategory {
    let competences = parse_entries::<RawCompetence>(raw.competences, "competences", language)
        .into_iter()
        .map(migrate_competence)
        .collect();

    CompetenceCategory {
        title: raw.title1,
        subtitle: raw.title2,
        competences,
    }
}

/// Reconciles the numeric score and the qualitative tag.
///
/// The score is authoritative when it lies on the 1–3 scale; a disagreeing tag
/// is reported and replaced. The tag is used only when the score is unusable.
pub fn migrate_competence(raw: RawCompetence) -> Competence {
    let from_score = u8::try_from(raw.data).ok().and_then(SkillLevel::from_score);
    let from_tag = raw.level.as_deref().and_then(SkillLevel::parse);

    let level = match (from_score, from_tag) {
        (Some(derived), Some(tagged)) if derived != tagged => {
            warn!(
                skill = %raw.label,
                score = raw.data,
                tag = tagged.key(),
                derived = derived.key(),
                "skill level tag disagrees with numeric score; using score"
            );
            Some(derived)
        }
        (Some(derived), _) => Some(derived),
        (None, Some(tagged)) => {
            warn!(skill = %raw.label, score = raw.data, "skill score outside 1-3; using level tag");
            Some(tagged)
        }
        (None, None) => {
            warn!(skill = %raw.label, score = raw.data, "skill level could not be determined");
            None
        }
    };

    Competence {
        label: raw.label,
        level,
        description: raw.description,
    }
}

fn migrate_formation(raw: RawFormation) -> Formation {
    Formation {
        id: raw.id,
        program: raw.nom_formation,
        school: raw.nom_ecole,
        location: raw.localisation,
        start_date: raw.date_debut,
        end_date: non_empty(raw.date_fin),
        image: non_empty(raw.image),
        diplomas: raw.diplomes,
    }
}

fn migrate_recommendation(raw: RawRecommendation) -> Recommendation {
    Recommendation {
        id: raw.id,
        author: raw.nom_personne,
        role: raw.metier,
        company: raw.nom_entreprise,
        link: non_empty(raw.liens),
        text: raw.recommendation,
        translated: non_empty(raw.translated),
        logo: non_empty(raw.logo1),
    }
}

fn migrate_update(raw: RawUpdate) -> ProjectUpdate {
    ProjectUpdate {
        date: raw.date,
        description: raw.description,
    }
}

fn migrate_image(raw: RawImage) -> Option<ProjectImage> {
    let (url, kind) = match raw {
        RawImage::Url(url) => (Some(url), None),
        RawImage::Tagged { url, kind } => (url, kind),
    };
    let url = non_empty(url)?;
    let kind = match kind.as_deref().map(str::trim) {
        Some("mobile") => ImageKind::Mobile,
        Some("photo") => ImageKind::Photo,
        _ => ImageKind::Web,
    };
    Some(ProjectImage { url, kind })
}

fn migrate_sub_project(raw: RawSubProject) -> SubProject {
    SubProject {
        id: raw.id,
        name: raw.name,
        start_date: raw.start_date,
        end_date: non_empty(raw.end_date),
        description: raw.description,
        technologies: raw.technologies,
        tools: raw.tools,
        updates: raw.updates.into_iter().map(migrate_update).collect(),
        images: raw.images.into_iter().filter_map(migrate_image).collect(),
    }
}

/// Collapses a published project (new and legacy fields) to the canonical shape.
pub fn migrate_project(raw: RawProject, language: Language) -> Project {
    let name = non_empty(raw.name)
        .or_else(|| non_empty(raw.nom_projet))
        .unwrap_or_default();

    let status = non_empty(raw.status)
        .or_else(|| non_empty(raw.state))
        .map(|s| ProjectStatus::parse(&s))
        .unwrap_or(ProjectStatus::InProgress);
    if let ProjectStatus::Unknown(raw_status) = &status {
        warn!(id = raw.id, status = %raw_status, "unrecognized project status");
    }

    let start_date = non_empty(raw.start_date)
        .or_else(|| non_empty(raw.date_debut))
        .or_else(|| raw.updates.first().and_then(|u| non_empty(Some(u.date.clone()))))
        .unwrap_or_default();
    let end_date = non_empty(raw.end_date).or_else(|| non_empty(raw.date_fin));

    let category_source = if raw.categories.is_empty() {
        raw.category.into_iter().collect::<Vec<_>>()
    } else {
        raw.categories
    };
    let mut categories: Vec<ProjectCategory> = Vec::new();
    for tag in category_source {
        match ProjectCategory::parse(&tag) {
            Some(category) if !categories.contains(&category) => categories.push(category),
            Some(_) => {}
            None => warn!(id = raw.id, category = %tag, "dropping unknown project category"),
        }
    }

    let sub_projects = parse_entries::<RawSubProject>(raw.sub_projects, "subProjects", language)
        .into_iter()
        .map(migrate_sub_project)
        .collect();

    Project {
        id: raw.id,
        name,
        status,
        start_date,
        end_date,
        description: raw.description,
        categories,
        sub_projects,
        images: raw.images.into_iter().filter_map(migrate_image).collect(),
        technologies: raw.technologies,
        tools: raw.outils,
        updates: raw.updates.into_iter().map(migrate_update).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_project(value: Value) -> RawProject {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_new_fields_take_precedence_over_legacy() {
        let project = migrate_project(
            raw_project(json!({
                "id": 3,
                "name": "Greenhouse",
                "nomProjet": "Serre",
                "status": "termine",
                "state": "enCours",
                "startDate": "2021-03",
                "dateDebut": "2019-01",
            })),
            Language::Fr,
        );
        assert_eq!(project.name, "Greenhouse");
        assert_eq!(project.status, ProjectStatus::Completed);
        assert_eq!(project.start_date, "2021-03");
    }

    #[test]
    fn test_legacy_fields_fill_missing_values() {
        let project = migrate_project(
            raw_project(json!({
                "id": 4,
                "nomProjet": "Atelier",
                "state": "archive",
                "updates": [{ "date": "2018-05", "description": "Kick-off" }],
                "dateFin": "2019-02",
                "category": "wood",
            })),
            Language::Fr,
        );
        assert_eq!(project.name, "Atelier");
        assert_eq!(project.status, ProjectStatus::Archived);
        assert_eq!(project.start_date, "2018-05");
        assert_eq!(project.end_date.as_deref(), Some("2019-02"));
        assert_eq!(project.categories, vec![ProjectCategory::Wood]);
    }

    #[test]
    fn test_missing_status_defaults_to_in_progress() {
        let project = migrate_project(raw_project(json!({ "id": 9, "name": "X" })), Language::En);
        assert_eq!(project.status, ProjectStatus::InProgress);
    }

    #[test]
    fn test_categories_deduplicated_and_unknown_dropped() {
        let project = migrate_project(
            raw_project(json!({
                "id": 1,
                "name": "Mixed",
                "categories": ["informatics", "plastic", "informatics", "electronics"],
                "category": "wood",
            })),
            Language::En,
        );
        assert_eq!(
            project.categories,
            vec![ProjectCategory::Informatics, ProjectCategory::Electronics]
        );
    }

    #[test]
    fn test_images_accept_both_shapes() {
        let project = migrate_project(
            raw_project(json!({
                "id": 1,
                "name": "Pics",
                "images": ["/a.png", { "url": "/b.png", "type": "mobile" }, { "type": "photo" }, ""],
            })),
            Language::En,
        );
        assert_eq!(project.images.len(), 2);
        assert_eq!(project.images[0].kind, ImageKind::Web);
        assert_eq!(project.images[1].kind, ImageKind::Mobile);
    }

    #[test]
    fn test_malformed_sub_project_is_skipped() {
        let project = migrate_project(
            raw_project(json!({
                "id": 1,
                "name": "Parent",
                "subProjects": [
                    { "id": 1, "name": "ok", "technologies": ["Rust"] },
                    { "name": "missing id" },
                ],
            })),
            Language::En,
        );
        assert_eq!(project.sub_projects.len(), 1);
        assert_eq!(project.sub_projects[0].name, "ok");
    }

    #[test]
    fn test_competence_score_wins_over_tag() {
        let competence = migrate_competence(RawCompetence {
            label: "Rust".to_string(),
            data: 3,
            level: Some("junior".to_string()),
            description: String::new(),
        });
        assert_eq!(competence.level, Some(SkillLevel::Advanced));
    }

    #[test]
    fn test_competence_tag_used_when_score_out_of_range() {
        let competence = migrate_competence(RawCompetence {
            label: "Go".to_string(),
            data: 7,
            level: Some("intermediate".to_string()),
            description: String::new(),
        });
        assert_eq!(competence.level, Some(SkillLevel::Intermediate));

        let unknown = migrate_competence(RawCompetence {
            label: "Cobol".to_string(),
            data: 0,
            level: Some("guru".to_string()),
            description: String::new(),
        });
        assert_eq!(unknown.level, None);
    }

    #[test]
    fn test_current_mission_drops_end_date() {
        let raw: RawExperience = serde_json::from_value(json!({
            "id": 2,
            "nomDeMission": "Migration",
            "missionEnCours": true,
            "dateFin": "2024-01",
            "conditionDeFinDeMission": "Fin de budget",
        }))
        .unwrap();
        let exp = migrate_experience(raw);
        assert!(exp.current);
        assert_eq!(exp.end_date, None);
        assert_eq!(exp.visible_end_condition(), None);
    }

    #[test]
    fn test_document_skips_malformed_entries() {
        let raw: RawCvData = serde_json::from_value(json!({
            "personalInfo": { "nom": "Doe", "prenom": "Jane", "availabilityStatus": "in-mission-open" },
            "experiences": [ { "id": 1, "nomDeMission": "A" }, { "nomDeMission": "no id" } ],
            "recommendations": [ { "id": 1, "nomPersonne": "Bob", "recommendation": "Solid" } ],
        }))
        .unwrap();
        let cv = migrate_document(raw, Language::En);
        assert_eq!(cv.experiences.len(), 1);
        assert_eq!(cv.recommendations.len(), 1);
        assert_eq!(cv.personal_info.availability, Availability::InMissionOpen);
        assert_eq!(cv.personal_info.full_name(), "Jane Doe");
    }
}
