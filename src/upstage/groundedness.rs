//! `GroundednessCheck`: settings for the groundedness-check model, plus the
//! verdict it answers with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::UpstageConfig;
use crate::exports::Exported;
use crate::upstage::{require_model, ApiSettings, SettingsError};

pub const DEFAULT_GROUNDEDNESS_MODEL: &str = "solar-1-mini-groundedness-check";

#[derive(Debug, Clone, PartialEq)]
pub struct GroundednessCheck {
    pub model: String,
    pub api: ApiSettings,
}

impl GroundednessCheck {
    pub fn new() -> Self {
        Self { model: DEFAULT_GROUNDEDNESS_MODEL.to_string(), api: ApiSettings::default() }
    }

    pub fn from_config(config: &UpstageConfig) -> Self {
        Self { api: ApiSettings::from_config(config), ..Self::new() }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api.api_key = Some(api_key.into());
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        require_model(&self.model)?;
        self.api.validate()
    }
}

impl Default for GroundednessCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Exported for GroundednessCheck {
    const EXPORT_NAME: &'static str = "GroundednessCheck";
}

/// Whether an answer is supported by its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Groundedness {
    Grounded,
    NotGrounded,
    NotSure,
}

impl Groundedness {
    pub fn as_str(self) -> &'static str {
        match self {
            Groundedness::Grounded => "grounded",
            Groundedness::NotGrounded => "notGrounded",
            Groundedness::NotSure => "notSure",
        }
    }

    pub fn is_grounded(self) -> bool {
        self == Groundedness::Grounded
    }
}

impl FromStr for Groundedness {
    type Err = String;

    /// Parse the service label. Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "grounded" => Ok(Groundedness::Grounded),
            "notGrounded" => Ok(Groundedness::NotGrounded),
            "notSure" => Ok(Groundedness::NotSure),
            other => Err(format!("unknown groundedness label: {other}")),
        }
    }
}

impl fmt::Display for Groundedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
