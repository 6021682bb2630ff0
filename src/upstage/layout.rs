//! Layout analysis: `UpstageLayoutAnalysisParser` and `UpstageLayoutAnalysisLoader`.
//!
//! The parser carries the request options; the loader pairs a parser with
//! the document it is meant to read.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::UpstageConfig;
use crate::exports::Exported;
use crate::upstage::{ApiSettings, SettingsError};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },
    #[error("document not found: {0}")]
    MissingFile(PathBuf),
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

// ── Options ───────────────────────────────────────────────────────────────────

/// How analysed content is grouped into documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    /// One document for the whole file.
    #[default]
    None,
    Element,
    Page,
}

impl SplitType {
    pub fn as_str(self) -> &'static str {
        match self {
            SplitType::None => "none",
            SplitType::Element => "element",
            SplitType::Page => "page",
        }
    }
}

impl FromStr for SplitType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SplitType::None),
            "element" => Ok(SplitType::Element),
            "page" => Ok(SplitType::Page),
            other => Err(LayoutError::UnknownOption { kind: "split type", value: other.to_string() }),
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    Text,
    #[default]
    Html,
}

impl OutputType {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputType::Text => "text",
            OutputType::Html => "html",
        }
    }
}

impl FromStr for OutputType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputType::Text),
            "html" => Ok(OutputType::Html),
            other => Err(LayoutError::UnknownOption { kind: "output type", value: other.to_string() }),
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOptions {
    #[serde(default)]
    pub split: SplitType,
    #[serde(default)]
    pub output_type: OutputType,
    /// `None` lets the service decide.
    #[serde(default)]
    pub use_ocr: Option<bool>,
    /// Element categories dropped from the output.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

fn default_exclude() -> Vec<String> {
    vec!["header".to_string(), "footer".to_string()]
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            split: SplitType::default(),
            output_type: OutputType::default(),
            use_ocr: None,
            exclude: default_exclude(),
        }
    }
}

// ── Parser ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstageLayoutAnalysisParser {
    pub options: LayoutOptions,
    pub api: ApiSettings,
}

impl UpstageLayoutAnalysisParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &UpstageConfig) -> Self {
        Self { options: LayoutOptions::default(), api: ApiSettings::from_config(config) }
    }

    pub fn with_split(mut self, split: SplitType) -> Self {
        self.options.split = split;
        self
    }

    pub fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.options.output_type = output_type;
        self
    }

    pub fn with_ocr(mut self, use_ocr: bool) -> Self {
        self.options.use_ocr = Some(use_ocr);
        self
    }

    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_excluded(&self, category: &str) -> bool {
        self.options.exclude.iter().any(|c| c == category)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        Ok(self.api.validate()?)
    }
}

impl Exported for UpstageLayoutAnalysisParser {
    const EXPORT_NAME: &'static str = "UpstageLayoutAnalysisParser";
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct UpstageLayoutAnalysisLoader {
    pub file_path: PathBuf,
    pub parser: UpstageLayoutAnalysisParser,
}

impl UpstageLayoutAnalysisLoader {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self { file_path: file_path.into(), parser: UpstageLayoutAnalysisParser::new() }
    }

    pub fn from_config(file_path: impl Into<PathBuf>, config: &UpstageConfig) -> Self {
        Self { file_path: file_path.into(), parser: UpstageLayoutAnalysisParser::from_config(config) }
    }

    pub fn with_parser(mut self, parser: UpstageLayoutAnalysisParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Check the settings and that the document exists as a regular file.
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.parser.validate()?;
        if !self.file_path.exists() {
            return Err(LayoutError::MissingFile(self.file_path.clone()));
        }
        if !self.file_path.is_file() {
            return Err(LayoutError::NotAFile(self.file_path.clone()));
        }
        Ok(())
    }
}

impl Exported for UpstageLayoutAnalysisLoader {
    const EXPORT_NAME: &'static str = "UpstageLayoutAnalysisLoader";
}
