use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use super::{bad_request, internal_error};
use crate::extractors::AppJson;
use crate::models::{Question, SubmitQuizRequest};
use crate::services::{question_store::StoreError, quiz_grader, quiz_selector, AppState};

type ApiError = (StatusCode, Json<serde_json::Value>);

/// Returns a fresh random sample of the current question set. Full
/// question records are returned, correct answers included; the quiz UI is
/// trusted to withhold them.
pub async fn get_quiz(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let questions = load_question_set(&state).await?;
    let quiz = quiz_selector::select_quiz(&questions, state.config.quiz_size);

    tracing::info!("Serving quiz of {} questions", quiz.len());
    Ok((StatusCode::OK, Json(quiz)))
}

pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<SubmitQuizRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let questions = load_question_set(&state).await?;
    let result = quiz_grader::grade(&questions, &req.answers);

    tracing::info!("Graded quiz submission: {}/{}", result.score, result.total);
    Ok((StatusCode::OK, Json(result)))
}

async fn load_question_set(state: &AppState) -> Result<Vec<Question>, ApiError> {
    state.store.load_questions().await.map_err(|e| match e {
        StoreError::NoQuestions => bad_request(e.to_string()),
        other => internal_error(other.to_string()),
    })
}
