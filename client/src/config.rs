//! Client configuration: API key and base URL, supplied once.

use serde::Deserialize;
use thiserror::Error;
use xivapi_core::DEFAULT_BASE_URL;

pub const API_KEY_VAR: &str = "XIVAPI_KEY";
pub const BASE_URL_VAR: &str = "XIVAPI_BASE_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("XIVAPI_KEY is not set")]
    MissingApiKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read `XIVAPI_KEY` (required) and `XIVAPI_BASE_URL` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(default_base_url);
        Ok(Self { api_key, base_url })
    }
}
