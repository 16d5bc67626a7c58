use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{CategoryFilter, StatusFilter};
use crate::sections::ProjectView;
use crate::site::html_document;
use crate::state::AppState;

/// Interactive state carried in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    /// Project whose detail modal is open.
    pub project: Option<u32>,
    /// Enlarged image within the open project.
    pub image: Option<usize>,
}

impl PageQuery {
    fn is_default(&self) -> bool {
        self.status.is_none() && self.category.is_none() && self.project.is_none()
    }
}

fn project_view(query: &PageQuery, state: &AppState) -> Result<ProjectView, AppError> {
    let mut view = ProjectView {
        status: query
            .status
            .as_deref()
            .unwrap_or("all")
            .parse::<StatusFilter>()
            .map_err(AppError::Validation)?,
        category: query
            .category
            .as_deref()
            .unwrap_or("all")
            .parse::<CategoryFilter>()
            .map_err(AppError::Validation)?,
        ..ProjectView::default()
    };

    if let Some(id) = query.project {
        let data = state.store.cv_data();
        let project = data
            .projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::Validation(format!("unknown project {id}")))?;
        view.selection.open(project);
        if let Some(index) = query.image {
            view.selection.select_image(project, index);
        }
    }
    Ok(view)
}

/// GET /?status=&category=&project=&image=
///
/// Without interactive state the live page is served as is; otherwise a
/// fresh tree is rendered for the requested view.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let tree = if query.is_default() {
        state.site.live.snapshot()
    } else {
        state.site.render_tree(&project_view(&query, &state)?)
    };
    let title = format!("CV - {}", state.store.cv_data().personal_info.full_name());
    Ok(Html(html_document(&tree, &title, "")))
}
