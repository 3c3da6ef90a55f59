use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Config;
pub use services::AppState;

/// Uploaded documents can be sizeable; the axum default of 2 MB is too
/// tight for real PDFs.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn create_router(app_state: std::sync::Arc<services::AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any); // TODO: restrict to specific origins in production

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/upload-pdf", post(handlers::documents::upload_pdf))
        .route(
            "/generate-questions",
            post(handlers::documents::generate_questions),
        )
        .route(
            "/quiz",
            get(handlers::quiz::get_quiz).post(handlers::quiz::submit_quiz),
        )
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
