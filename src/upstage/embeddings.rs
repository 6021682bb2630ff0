//! `UpstageEmbeddings`: settings for the Solar embedding models.
//!
//! Upstage serves one model per input kind: documents go to
//! `<model>-passage`, search queries to `<model>-query`.

use crate::config::UpstageConfig;
use crate::exports::Exported;
use crate::upstage::{require_model, ApiSettings, SettingsError};

pub const DEFAULT_EMBEDDING_MODEL: &str = "solar-embedding-1-large";
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct UpstageEmbeddings {
    /// Base model name, without the `-query` / `-passage` suffix.
    pub model: String,
    /// Documents sent per request.
    pub embed_batch_size: usize,
    pub api: ApiSettings,
}

impl UpstageEmbeddings {
    pub fn new() -> Self {
        Self {
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
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

    pub fn with_embed_batch_size(mut self, size: usize) -> Self {
        self.embed_batch_size = size;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api.api_key = Some(api_key.into());
        self
    }

    pub fn query_model(&self) -> String {
        format!("{}-query", self.model)
    }

    pub fn passage_model(&self) -> String {
        format!("{}-passage", self.model)
    }

    /// Number of requests needed to embed `documents` texts.
    pub fn batch_count(&self, documents: usize) -> usize {
        documents.div_ceil(self.embed_batch_size.max(1))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        require_model(&self.model)?;
        if self.embed_batch_size == 0 {
            return Err(SettingsError::ZeroCount { field: "embed_batch_size" });
        }
        self.api.validate()
    }
}

impl Default for UpstageEmbeddings {
    fn default() -> Self {
        Self::new()
    }
}

impl Exported for UpstageEmbeddings {
    const EXPORT_NAME: &'static str = "UpstageEmbeddings";
}
