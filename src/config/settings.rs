use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

use crate::config::{CatalogConfig, ConnectionConfig, LogConfig, RunnerConfig};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub connection: ConnectionConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub logs: LogConfig,
}

fn get_env_file_name() -> String {
    if let Ok(env_file) = std::env::var("RATCHET_ENV_FILE") {
        return env_file;
    }
    if let Ok(env_name) = std::env::var("RATCHET_ENV") {
        match env_name.as_str().to_lowercase().as_str() {
            "dev" => return ".env.dev".to_string(),
            "test" => return ".env.test".to_string(),
            _ => return ".env".to_string(),
        }
    }
    ".env".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load an env file selected via RATCHET_ENV / RATCHET_ENV_FILE; a
        // missing file is fine
        dotenvy::from_filename(get_env_file_name()).ok();

        let settings = Config::builder()
            // Nested sections map from RATCHET__SECTION__FIELD variables
            .add_source(
                Environment::with_prefix("RATCHET")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let settings: Settings = settings.try_deserialize()?;

        Ok(settings)
    }
}
