use axum::{extract::State, Json};
use serde::Deserialize;

use crate::content::StoreState;
use crate::errors::AppError;
use crate::models::Language;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SetLanguageRequest {
    pub language: String,
}

/// GET /api/v1/language
pub async fn handle_get_language(State(state): State<AppState>) -> Json<StoreState> {
    Json(state.store.snapshot())
}

/// POST /api/v1/language
pub async fn handle_set_language(
    State(state): State<AppState>,
    Json(req): Json<SetLanguageRequest>,
) -> Result<Json<StoreState>, AppError> {
    let language: Language = req.language.parse().map_err(AppError::Validation)?;
    let snapshot = state.store.set_language(language).await?;
    Ok(Json(snapshot))
}
