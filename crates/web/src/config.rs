//! Runtime configuration, read from environment variables.
//!
//! Every key except the identity API key has a default; falling back to one
//! is logged at `warn`.

use std::path::PathBuf;

use thiserror::Error;

pub use crate::identity_toolkit::DEFAULT_SECURE_TOKEN_URL;

pub const BACKEND_URL_VAR: &str = "JUSTIFAI_BACKEND_URL";
pub const IDENTITY_URL_VAR: &str = "JUSTIFAI_IDENTITY_URL";
pub const IDENTITY_API_KEY_VAR: &str = "JUSTIFAI_IDENTITY_API_KEY";
pub const SECURE_TOKEN_URL_VAR: &str = "JUSTIFAI_SECURE_TOKEN_URL";
pub const CHATBOT_URL_VAR: &str = "JUSTIFAI_CHATBOT_URL";
pub const AUTH_FLAG_PATH_VAR: &str = "JUSTIFAI_AUTH_FLAG_PATH";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_CHATBOT_URL: &str = "https://cdn.botpress.cloud/webchat/v2.3/shareable.html?configUrl=https://files.bpcontent.cloud/2025/02/20/19/20250220190100-D53A0MQA.json";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is not a valid http(s) URL: {value}")]
    InvalidUrl { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub backend_url: String,
    pub identity_url: String,
    pub identity_api_key: String,
    pub secure_token_url: String,
    pub chatbot_url: String,
    /// `None` means the platform default location.
    pub auth_flag_path: Option<PathBuf>,
}

impl WebConfig {
    /// Read the process environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the values baked in when the browser bundle was compiled.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                BACKEND_URL_VAR => option_env!("JUSTIFAI_BACKEND_URL"),
                IDENTITY_URL_VAR => option_env!("JUSTIFAI_IDENTITY_URL"),
                IDENTITY_API_KEY_VAR => option_env!("JUSTIFAI_IDENTITY_API_KEY"),
                SECURE_TOKEN_URL_VAR => option_env!("JUSTIFAI_SECURE_TOKEN_URL"),
                CHATBOT_URL_VAR => option_env!("JUSTIFAI_CHATBOT_URL"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let or_default = |key: &'static str, default: &str| {
            get(key).unwrap_or_else(|| {
                tracing::warn!("{key} not set; using default {default}");
                default.to_string()
            })
        };

        let backend_url = or_default(BACKEND_URL_VAR, DEFAULT_BACKEND_URL);
        let identity_url = or_default(IDENTITY_URL_VAR, DEFAULT_IDENTITY_URL);
        let secure_token_url = or_default(SECURE_TOKEN_URL_VAR, DEFAULT_SECURE_TOKEN_URL);
        let chatbot_url = or_default(CHATBOT_URL_VAR, DEFAULT_CHATBOT_URL);
        let identity_api_key =
            get(IDENTITY_API_KEY_VAR).ok_or(ConfigError::Missing(IDENTITY_API_KEY_VAR))?;

        validate_url(BACKEND_URL_VAR, &backend_url)?;
        validate_url(IDENTITY_URL_VAR, &identity_url)?;
        validate_url(SECURE_TOKEN_URL_VAR, &secure_token_url)?;
        validate_url(CHATBOT_URL_VAR, &chatbot_url)?;

        Ok(Self {
            backend_url,
            identity_url,
            identity_api_key,
            secure_token_url,
            chatbot_url,
            auth_flag_path: get(AUTH_FLAG_PATH_VAR).map(PathBuf::from),
        })
    }
}

fn validate_url(var: &'static str, value: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        var,
        value: value.to_string(),
    };

    let url = reqwest::Url::parse(value).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(invalid()),
    }
}
