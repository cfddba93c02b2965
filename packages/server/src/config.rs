use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openai_api_key: String,
    /// OpenAI-compatible endpoint; `None` means api.openai.com
    pub openai_base_url: Option<String>,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    pub llm_timeout: Duration,
    pub product_catalog_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            openai_base_url: non_empty_var("OPENAI_BASE_URL"),
            llm_model: non_empty_var("LLM_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            llm_temperature: env::var("LLM_TEMPERATURE")
                .unwrap_or_else(|_| "0.7".to_string())
                .parse()
                .context("LLM_TEMPERATURE must be a number")?,
            llm_max_tokens: env::var("LLM_MAX_TOKENS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .context("LLM_MAX_TOKENS must be a positive integer")?,
            llm_timeout: Duration::from_secs(
                env::var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            product_catalog_path: non_empty_var("PRODUCT_CATALOG_PATH").map(PathBuf::from),
        })
    }

    /// Bound on a whole HTTP request: two completion calls plus slack.
    pub fn request_timeout(&self) -> Duration {
        self.llm_timeout
            .saturating_mul(2)
            .saturating_add(Duration::from_secs(5))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_timeout_covers_both_passes() {
        let config = Config {
            port: 8080,
            openai_api_key: "sk-test".into(),
            openai_base_url: None,
            llm_model: "gpt-4o-mini".into(),
            llm_temperature: 0.7,
            llm_max_tokens: 500,
            llm_timeout: Duration::from_secs(30),
            product_catalog_path: None,
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(65));
    }

    #[test]
    fn request_timeout_saturates_on_huge_llm_timeout() {
        let config = Config {
            port: 8080,
            openai_api_key: "sk-test".into(),
            openai_base_url: None,
            llm_model: "gpt-4o-mini".into(),
            llm_temperature: 0.7,
            llm_max_tokens: 500,
            llm_timeout: Duration::from_secs(u64::MAX),
            product_catalog_path: None,
        };
        assert_eq!(config.request_timeout(), Duration::MAX);
    }
}
