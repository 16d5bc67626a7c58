use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::export::{ExportArtifact, ExportPhase, ExportStrategy, Notification};
use crate::sections::NavTarget;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ExportQuery {
    pub strategy: Option<String>,
}

#[derive(Serialize)]
pub struct ExportStatus {
    pub phase: ExportPhase,
}

#[derive(Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum NavigateResponse {
    Scroll { anchor: String },
}

fn parse_strategy(raw: Option<&str>) -> Result<ExportStrategy, AppError> {
    raw.map(str::parse::<ExportStrategy>)
        .transpose()
        .map_err(AppError::Validation)
        .map(Option::unwrap_or_default)
}

/// Serves the artifact as a named download.
fn attachment(artifact: ExportArtifact) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);
    (
        [
            (header::CONTENT_TYPE, artifact.mime.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}

/// GET /api/v1/export?strategy=print|document
pub async fn handle_export(
    State(state): State<AppState>,
    Query(params): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let strategy = parse_strategy(params.strategy.as_deref())?;
    let artifact = state.orchestrator.export(strategy).await?;
    Ok(attachment(artifact))
}

/// GET /api/v1/export/status
pub async fn handle_export_status(State(state): State<AppState>) -> Json<ExportStatus> {
    Json(ExportStatus {
        phase: state.orchestrator.phase(),
    })
}

/// GET /api/v1/notifications
pub async fn handle_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.orchestrator.notifier().active())
}

/// POST /api/v1/navigate/:anchor
///
/// Section anchors scroll; the download pseudo-section runs a document export
/// and answers with the file.
pub async fn handle_navigate(
    State(state): State<AppState>,
    Path(anchor): Path<String>,
) -> Result<Response, AppError> {
    let target: NavTarget = anchor.parse().map_err(AppError::Validation)?;
    match target {
        NavTarget::Section(section) => Ok(Json(NavigateResponse::Scroll {
            anchor: section.anchor().to_string(),
        })
        .into_response()),
        NavTarget::Download => {
            let artifact = state.orchestrator.export(ExportStrategy::default()).await?;
            Ok(attachment(artifact))
        }
    }
}
