use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSettings {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub question_count: u32,
    pub max_source_chars: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub generator: GeneratorSettings,
    pub quiz_size: usize,
    pub data_dir: String,
    pub bind_addr: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load environment variables from root .env file (two levels up)
        // Try root .env first, then fallback to local .env
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        // Determine environment (defaults to dev)
        let env_name = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env_name)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        // The completion-service credential is the one setting with no usable
        // default: fail loudly at startup instead of surfacing an opaque 401
        // at generation time.
        let api_key = settings
            .get_string("generator.api_key")
            .or_else(|_| env::var("SARVAM_API_KEY"))
            .map_err(|_| {
                config::ConfigError::Message(
                    "SARVAM_API_KEY (or generator.api_key) must be set to call the completion service"
                        .to_string(),
                )
            })?;

        let api_url = settings
            .get_string("generator.api_url")
            .or_else(|_| env::var("SARVAM_API_URL"))
            .unwrap_or_else(|_| "https://api.sarvam.ai/v1/chat/completions".to_string());

        let model = settings
            .get_string("generator.model")
            .unwrap_or_else(|_| "sarvam-m".to_string());

        let question_count = settings
            .get_int("generator.question_count")
            .map(|v| v as u32)
            .unwrap_or(15);

        let max_source_chars = settings
            .get_int("generator.max_source_chars")
            .map(|v| v as usize)
            .unwrap_or(5000);

        let timeout_secs = settings
            .get_int("generator.timeout_secs")
            .map(|v| v as u64)
            .unwrap_or(30);

        let quiz_size = settings
            .get_int("quiz.size")
            .map(|v| v as usize)
            .unwrap_or(10);

        let data_dir = settings
            .get_string("storage.data_dir")
            .or_else(|_| env::var("DATA_DIR"))
            .unwrap_or_else(|_| "data".to_string());

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:4000".to_string());

        Ok(Config {
            generator: GeneratorSettings {
                api_url,
                api_key,
                model,
                question_count,
                max_source_chars,
                timeout_secs,
            },
            quiz_size,
            data_dir,
            bind_addr,
        })
    }
}
