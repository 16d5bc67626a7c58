use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::i18n::Translator;
use crate::models::{CategoryFilter, Project, ProjectCategory, ProjectStatus, StatusFilter};
use crate::projects::{all_images, all_technologies, filter_and_sort, sort_technologies_by_priority};
use crate::projects::{status_swatch, Swatch};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ProjectQuery {
    pub status: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct ProjectSummary {
    pub id: u32,
    pub name: String,
    pub status: ProjectStatus,
    pub status_label: String,
    pub status_swatch: Swatch,
    pub categories: Vec<ProjectCategory>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub technologies: Vec<String>,
    pub image_count: usize,
}

impl ProjectSummary {
    fn from_project(project: &Project, t: &Translator) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            status: project.status.clone(),
            status_label: t.t(&project.status.label_key()),
            status_swatch: status_swatch(&project.status),
            categories: project.categories.clone(),
            start_date: project.start_date.clone(),
            end_date: project.end_date.clone(),
            technologies: sort_technologies_by_priority(&all_technologies(project)),
            image_count: all_images(project).len(),
        }
    }
}

#[derive(Serialize)]
pub struct ProjectListResponse {
    pub total: usize,
    pub projects: Vec<ProjectSummary>,
}

/// GET /api/v1/projects?status=&category=
pub async fn handle_list_projects(
    State(state): State<AppState>,
    Query(params): Query<ProjectQuery>,
) -> Result<Json<ProjectListResponse>, AppError> {
    let status: StatusFilter = params
        .status
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(AppError::Validation)?;
    let category: CategoryFilter = params
        .category
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(AppError::Validation)?;

    let (store_state, data) = state.store.current();
    let t = Translator::new(state.resolver.clone(), store_state.language);
    let projects: Vec<ProjectSummary> = filter_and_sort(&data.projects, &status, &category)
        .into_iter()
        .map(|p| ProjectSummary::from_project(p, &t))
        .collect();

    Ok(Json(ProjectListResponse {
        total: data.projects.len(),
        projects,
    }))
}
