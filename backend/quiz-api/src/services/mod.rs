use reqwest::Client;

use crate::config::Config;
use self::question_generator::QuestionGenerator;
use self::question_store::QuestionStore;

pub struct AppState {
    pub config: Config,
    pub store: QuestionStore,
    pub generator: QuestionGenerator,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = QuestionStore::file(&config.data_dir);
        Self::with_store(config, store)
    }

    /// Builds state around an injected store backend (in-memory for tests).
    pub fn with_store(config: Config, store: QuestionStore) -> Self {
        let generator = QuestionGenerator::new(Client::new(), config.generator.clone());
        Self {
            config,
            store,
            generator,
        }
    }
}

pub mod question_generator;
pub mod question_store;
pub mod quiz_grader;
pub mod quiz_selector;
pub mod text_extractor;
