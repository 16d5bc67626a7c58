use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and content state.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let store = state.store.snapshot();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cv",
        "language": store.language,
        "hydrated": store.hydrated,
        "locales_loaded": state.resolver.is_loaded(),
        "production": state.config.production,
    }))
}
