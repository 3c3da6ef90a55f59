use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::services::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let text_uploaded = state.store.has_text().await.unwrap_or(false);
    let questions_generated = state.store.has_questions().await.unwrap_or(false);

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "docquiz-api",
            "version": env!("CARGO_PKG_VERSION"),
            "text_uploaded": text_uploaded,
            "questions_generated": questions_generated,
        })),
    )
}

pub(crate) fn bad_request(message: String) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

pub(crate) fn internal_error(message: String) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

pub mod documents;
pub mod quiz;
