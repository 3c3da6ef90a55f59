use axum::Router;
use std::sync::Arc;

use docquiz_api::{
    config::{Config, GeneratorSettings},
    create_router,
    models::Question,
    services::{question_store::QuestionStore, AppState},
};

pub fn test_config() -> Config {
    Config {
        generator: GeneratorSettings {
            // Port 9 (discard) is never reachable; no test exercises the
            // external completion call.
            api_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            api_key: "test-key".to_string(),
            model: "sarvam-m".to_string(),
            question_count: 15,
            max_source_chars: 5000,
            timeout_secs: 1,
        },
        quiz_size: 10,
        data_dir: "unused-in-tests".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
    }
}

pub fn create_test_app() -> (Router, Arc<AppState>) {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let app_state = Arc::new(AppState::with_store(test_config(), QuestionStore::memory()));
    (create_router(app_state.clone()), app_state)
}

pub fn sample_questions() -> Vec<Question> {
    (0..12)
        .map(|i| Question {
            text: format!("What is {} + {}?", i, i),
            options: vec![
                format!("{}", 2 * i),
                format!("{}", 2 * i + 1),
                format!("{}", 2 * i + 2),
            ],
            correct_answer: format!("{}", 2 * i),
            source_chapter: if i % 2 == 0 {
                Some(format!("Chapter {}", i / 2))
            } else {
                None
            },
        })
        .collect()
}
