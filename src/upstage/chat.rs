//! `ChatUpstage`: settings for the Solar chat completion model.

use crate::config::UpstageConfig;
use crate::exports::Exported;
use crate::upstage::{require_model, ApiSettings, SettingsError};

pub const DEFAULT_CHAT_MODEL: &str = "solar-1-mini-chat";

/// Chat model handle. Constructed once, then cloned freely.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatUpstage {
    pub model: String,
    /// Sampling temperature, `0.0..=2.0`.
    pub temperature: f32,
    /// Upper bound on generated tokens. `None` leaves it to the service.
    pub max_tokens: Option<u32>,
    pub api: ApiSettings,
}

impl ChatUpstage {
    pub fn new() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: None,
            api: ApiSettings::default(),
        }
    }

    pub fn from_config(config: &UpstageConfig) -> Self {
        Self { api: ApiSettings::from_config(config), ..Self::new() }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api.api_key = Some(api_key.into());
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        require_model(&self.model)?;
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(SettingsError::Temperature(self.temperature));
        }
        if self.max_tokens == Some(0) {
            return Err(SettingsError::ZeroCount { field: "max_tokens" });
        }
        self.api.validate()
    }
}

impl Default for ChatUpstage {
    fn default() -> Self {
        Self::new()
    }
}

impl Exported for ChatUpstage {
    const EXPORT_NAME: &'static str = "ChatUpstage";
}
