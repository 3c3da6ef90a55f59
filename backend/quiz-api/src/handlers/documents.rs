use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use super::{bad_request, internal_error};
use crate::models::{GenerateResponse, UploadResponse};
use crate::services::{
    question_generator::GenerationError,
    question_store::{StoreError, QUESTIONS_SLOT},
    text_extractor, AppState,
};

type ApiError = (StatusCode, Json<serde_json::Value>);

pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("Failed to read uploaded file: {}", e)))?;
            file_bytes = Some(bytes.to_vec());
            break;
        }
    }

    let Some(bytes) = file_bytes else {
        return Err(bad_request("No PDF uploaded".to_string()));
    };

    tracing::info!("Received PDF upload ({} bytes)", bytes.len());

    let text = text_extractor::extract_pdf_text(bytes).await.map_err(|e| {
        tracing::error!("PDF extraction failed: {:#}", e);
        internal_error(e.to_string())
    })?;

    state
        .store
        .save_text(&text)
        .await
        .map_err(|e| internal_error(e.to_string()))?;

    tracing::info!("Stored extracted text ({} chars)", text.chars().count());

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            message: "PDF text saved successfully".to_string(),
        }),
    ))
}

pub async fn generate_questions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let text = match state.store.load_text().await {
        Ok(text) => text,
        Err(e @ StoreError::NoText) => return Err(bad_request(e.to_string())),
        Err(e) => return Err(internal_error(e.to_string())),
    };

    let questions = state.generator.generate(&text).await.map_err(|e| {
        tracing::error!("Question generation failed: {}", e);
        let status = match &e {
            GenerationError::EmptySource => StatusCode::BAD_REQUEST,
            GenerationError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GenerationError::Transport(_) | GenerationError::UpstreamStatus { .. } => {
                StatusCode::BAD_GATEWAY
            }
            GenerationError::Unauthorized(_) | GenerationError::InvalidFormat(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": e.to_string() })))
    })?;

    // Persist only after the whole batch validated; a failed generation
    // leaves the previous set untouched.
    state
        .store
        .save_questions(&questions)
        .await
        .map_err(|e| internal_error(e.to_string()))?;

    tracing::info!("Stored {} generated questions", questions.len());

    Ok((
        StatusCode::OK,
        Json(GenerateResponse {
            ok: true,
            total: questions.len(),
            file: QUESTIONS_SLOT.to_string(),
        }),
    ))
}
