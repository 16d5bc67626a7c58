pub mod health;
pub mod page;

use axum::{
    routing::{get, post},
    Router,
};

use crate::content::handlers as content;
use crate::export::handlers as export;
use crate::projects::handlers as projects;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(page::page_handler))
        // Content store
        .route(
            "/api/v1/language",
            get(content::handle_get_language).post(content::handle_set_language),
        )
        // Project grid
        .route("/api/v1/projects", get(projects::handle_list_projects))
        // Export
        .route("/api/v1/export", get(export::handle_export))
        .route("/api/v1/export/status", get(export::handle_export_status))
        .route("/api/v1/navigate/:anchor", post(export::handle_navigate))
        .route("/api/v1/notifications", get(export::handle_notifications))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::tests::make_config;
    use crate::content::FileLanguagePersistence;

    async fn make_app(dir: &std::path::Path) -> (Router, AppState) {
        let config = make_config(dir);
        let persistence = Arc::new(FileLanguagePersistence::new(config.state_path.clone()));
        let state = AppState::bootstrap(config, persistence).await.unwrap();
        (build_router(state.clone()), state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = make_app(dir.path()).await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["service"], "cv");
        assert_eq!(body["hydrated"], true);
    }

    #[tokio::test]
    async fn test_set_language_rerenders_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = make_app(dir.path()).await;
        let watcher = state.site.spawn_watcher();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/language")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"language":"en"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["language"], "en");

        let persisted = std::fs::read_to_string(dir.path().join("state.json")).unwrap();
        assert!(persisted.contains("\"en\""));

        let response = app
            .oneshot(
                Request::post("/api/v1/language")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"language":"de"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        watcher.abort();
    }

    #[tokio::test]
    async fn test_page_and_project_filters() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = make_app(dir.path()).await;
        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(html.to_vec()).unwrap();
        assert!(html.contains("id=\"experience\""));

        let response = app
            .clone()
            .oneshot(Request::get("/api/v1/projects?status=completed").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        for project in body["projects"].as_array().unwrap() {
            assert_eq!(project["status"], "termine");
        }

        let response = app
            .oneshot(Request::get("/?status=bogus").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_print_export_returns_named_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = make_app(dir.path()).await;
        let response = app
            .clone()
            .oneshot(Request::get("/api/v1/export?strategy=print").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"CV_"));
        assert!(disposition.ends_with(".html\""));
        assert!(!state.site.live.snapshot().has_class("generating-pdf"));

        let response = app
            .oneshot(Request::get("/api/v1/notifications").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body[0]["kind"], "success");
    }

    #[tokio::test]
    async fn test_navigate_scrolls_or_rejects() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = make_app(dir.path()).await;
        let response = app
            .clone()
            .oneshot(Request::post("/api/v1/navigate/skills").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["action"], "scroll");
        assert_eq!(body["anchor"], "skills");

        let response = app
            .oneshot(Request::post("/api/v1/navigate/contact").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_anchor_returns_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = make_app(dir.path()).await;
        let response = app
            .oneshot(Request::post("/api/v1/navigate/download-cv").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.ends_with(".pdf\""));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(!state.site.live.snapshot().has_class("generating-pdf"));
    }
}
