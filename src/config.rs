use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub feddit: FedditConfig,
    pub classifier: ClassifierConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FedditConfig {
    pub base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_feddit_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    #[serde(default = "default_classifier_timeout")]
    pub timeout_secs: u64,
    // Loaded from env
    #[serde(skip)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

fn default_page_size() -> u32 {
    5000
}

fn default_feddit_timeout() -> u64 {
    30
}

fn default_max_concurrent() -> usize {
    8
}

fn default_classifier_timeout() -> u64 {
    10
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_text =
            std::fs::read_to_string("config.toml").context("Failed to read config.toml")?;
        let mut config: AppConfig =
            toml::from_str(&config_text).context("Failed to parse config.toml")?;

        if let Ok(base_url) = std::env::var("FEDDIT_API_BASE_URL") {
            config.feddit.base_url = base_url;
        }
        config.classifier.api_key =
            std::env::var("HUGGINGFACE_API_KEY").context("HUGGINGFACE_API_KEY not set")?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_with_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [feddit]
            base_url = "http://localhost:8080"

            [classifier]
            base_url = "https://api-inference.huggingface.co"
            model = "cardiffnlp/twitter-roberta-base-sentiment-latest"

            [web]
            host = "127.0.0.1"
            port = 8000
            "#,
        )
        .unwrap();

        assert_eq!(config.feddit.page_size, 5000);
        assert_eq!(config.feddit.timeout_secs, 30);
        assert_eq!(config.classifier.max_concurrent, 8);
        assert_eq!(config.classifier.timeout_secs, 10);
        assert_eq!(config.web.port, 8000);
        assert!(config.classifier.api_key.is_empty());
    }

    #[test]
    fn parses_explicit_values() {
        let config: AppConfig = toml::from_str(
            r#"
            [feddit]
            base_url = "http://feddit:8080"
            page_size = 25
            timeout_secs = 5

            [classifier]
            base_url = "http://model:9000"
            model = "some/model"
            max_concurrent = 2
            timeout_secs = 3

            [web]
            host = "0.0.0.0"
            port = 9999
            "#,
        )
        .unwrap();

        assert_eq!(config.feddit.page_size, 25);
        assert_eq!(config.classifier.max_concurrent, 2);
        assert_eq!(config.classifier.model, "some/model");
    }
}
