use crate::analysis::AnalysisConfig;
use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub llm: LLMConfig,
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo-instruct".to_string(),
            max_tokens: 4000,
            temperature: 0.7,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 60,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "interactions.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let config = Config::builder()
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn api_key() -> Result<String> {
        env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_client() {
        let settings = Settings::default();
        assert_eq!(settings.llm.model, "gpt-3.5-turbo-instruct");
        assert_eq!(settings.llm.max_tokens, 4000);
        assert_eq!(settings.storage.database_path, "interactions.db");
        assert_eq!(settings.analysis.num_topics, 5);
        assert_eq!(settings.analysis.top_words_per_topic, 10);
    }

    #[test]
    fn test_partial_sources_keep_defaults() {
        let settings: Settings = Config::builder()
            .set_override("analysis.num_topics", 3)
            .unwrap()
            .set_override("storage.database_path", "/tmp/log.db")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.analysis.num_topics, 3);
        assert_eq!(settings.analysis.top_words_per_topic, 10);
        assert_eq!(settings.storage.database_path, "/tmp/log.db");
        assert_eq!(settings.llm.max_retries, 3);
    }
}
