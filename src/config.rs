use anyhow::{bail, Result};

use crate::api::catalog::DEFAULT_MODEL;
use crate::util::non_empty_env;

pub const API_KEY_ENV: &str = "CFOR_OPENAI_API_KEY";
pub const FALLBACK_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "CFOR_OPENAI_MODEL";
pub const API_URL_ENV: &str = "CFOR_OPENAI_API_URL";
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub os_name: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let api_key = non_empty_env(API_KEY_ENV).or_else(|| non_empty_env(FALLBACK_API_KEY_ENV));
        let model = non_empty_env(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_url = non_empty_env(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            api_key,
            model,
            api_url,
            os_name: std::env::consts::OS.to_string(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            bail!(
                "Invalid {API_URL_ENV} '{}': expected http:// or https:// URL",
                self.api_url
            );
        }

        Ok(())
    }
}
