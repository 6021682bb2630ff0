//! Upstage client surface.
//!
//! Each public type here is a settings holder for one Upstage service.
//! The types are what the crate exports; request execution lives outside
//! this crate. Shared connection settings are carried by [`ApiSettings`].

pub mod chat;
pub mod embeddings;
pub mod groundedness;
pub mod layout;

use std::fmt;

use thiserror::Error;

use crate::config::UpstageConfig;

pub const DEFAULT_API_BASE_URL: &str = "https://api.upstage.ai/v1/solar";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("model name must not be empty")]
    EmptyModel,
    #[error("api base url must start with http:// or https://: {0}")]
    InvalidBaseUrl(String),
    #[error("timeout must be at least one second")]
    ZeroTimeout,
    #[error("temperature {0} is outside 0.0..=2.0")]
    Temperature(f32),
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
}

// ── Connection settings ───────────────────────────────────────────────────────

/// Endpoint, timeout, and credentials shared by every Upstage type.
///
/// `api_key` comes from `UPSTAGE_API_KEY` (never TOML) and is never printed.
#[derive(Clone, PartialEq)]
pub struct ApiSettings {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub api_key: Option<String>,
}

impl ApiSettings {
    pub fn from_config(config: &UpstageConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.clone(),
            timeout_seconds: config.timeout_seconds,
            api_key: config.api_key.clone(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://")) {
            return Err(SettingsError::InvalidBaseUrl(self.api_base_url.clone()));
        }
        if self.timeout_seconds == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(())
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            api_key: None,
        }
    }
}

impl fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSettings")
            .field("api_base_url", &self.api_base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

pub(crate) fn require_model(model: &str) -> Result<(), SettingsError> {
    if model.trim().is_empty() {
        return Err(SettingsError::EmptyModel);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let s = ApiSettings { api_key: Some("up_secret".into()), ..ApiSettings::default() };
        let text = format!("{s:?}");
        assert!(!text.contains("up_secret"));
        assert!(text.contains("<redacted>"));
    }

    #[test]
    fn defaults_are_valid() {
        let s = ApiSettings::default();
        assert!(s.validate().is_ok());
        assert!(!s.has_api_key());
    }

    #[test]
    fn empty_key_is_no_key() {
        let s = ApiSettings { api_key: Some(String::new()), ..ApiSettings::default() };
        assert!(!s.has_api_key());
    }

    #[test]
    fn rejects_bad_url_and_zero_timeout() {
        let s = ApiSettings { api_base_url: "api.upstage.ai".into(), ..ApiSettings::default() };
        assert!(matches!(s.validate(), Err(SettingsError::InvalidBaseUrl(_))));

        let s = ApiSettings { timeout_seconds: 0, ..ApiSettings::default() };
        assert_eq!(s.validate(), Err(SettingsError::ZeroTimeout));
    }

    #[test]
    fn from_config_copies_fields() {
        let cfg = UpstageConfig {
            api_base_url: "http://localhost:8000/v1".into(),
            timeout_seconds: 5,
            api_key: Some("k".into()),
        };
        let s = ApiSettings::from_config(&cfg);
        assert_eq!(s.api_base_url, "http://localhost:8000/v1");
        assert_eq!(s.timeout_seconds, 5);
        assert!(s.has_api_key());
    }
}
