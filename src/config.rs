//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (or an explicit `-f` path), then applies `UPSTAGE_LOG_LEVEL` and
//! `UPSTAGE_API_BASE` env overrides. `UPSTAGE_API_KEY` is env-only.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;
use crate::logger;
use crate::upstage::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECONDS};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Connection settings shared by every Upstage type.
/// Populated from `[upstage]` in the TOML.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstageConfig {
    pub api_base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// From `UPSTAGE_API_KEY`. Never sourced from TOML.
    pub api_key: Option<String>,
}

impl Default for UpstageConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_seconds: default_timeout_seconds(),
            api_key: None,
        }
    }
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// Append log output here instead of stderr (already expanded, no `~`).
    pub log_file: Option<PathBuf>,
    /// Expected manifest file. `None` means the built-in manifest.
    pub manifest_path: Option<PathBuf>,
    pub upstage: UpstageConfig,
}

/// Values that beat the TOML file. `load` fills these from the environment;
/// tests pass them directly.
#[derive(Debug, Clone, Default)]
pub struct Overrides<'a> {
    pub log_level: Option<&'a str>,
    pub api_base_url: Option<&'a str>,
    pub api_key: Option<&'a str>,
}

/// Raw TOML shape, the `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    upstage: RawUpstage,
    #[serde(default)]
    log: RawLog,
    #[serde(default)]
    manifest: RawManifest,
}

#[derive(Deserialize)]
struct RawUpstage {
    #[serde(default = "default_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawUpstage {
    fn default() -> Self {
        Self { api_base_url: default_api_base_url(), timeout_seconds: default_timeout_seconds() }
    }
}

#[derive(Deserialize)]
struct RawLog {
    #[serde(default = "default_log_level")]
    level: String,
    #[serde(default)]
    file: Option<String>,
}

impl Default for RawLog {
    fn default() -> Self {
        Self { level: default_log_level(), file: None }
    }
}

#[derive(Deserialize, Default)]
struct RawManifest {
    #[serde(default)]
    path: Option<String>,
}

fn default_api_base_url() -> String { DEFAULT_API_BASE_URL.to_string() }
fn default_timeout_seconds() -> u64 { DEFAULT_TIMEOUT_SECONDS }
fn default_log_level() -> String { "warn".to_string() }

/// Load config, then apply env-var overrides.
///
/// With no explicit path, a missing `config/default.toml` falls back to
/// built-in defaults. An explicit path that cannot be read is an error.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let log_level = env::var("UPSTAGE_LOG_LEVEL").ok();
    let api_base_url = env::var("UPSTAGE_API_BASE").ok();
    let api_key = env::var("UPSTAGE_API_KEY").ok();
    let overrides = Overrides {
        log_level: log_level.as_deref(),
        api_base_url: api_base_url.as_deref(),
        api_key: api_key.as_deref(),
    };

    match config_path {
        Some(path) => load_from(Path::new(path), &overrides),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_from(Path::new(DEFAULT_CONFIG_PATH), &overrides)
        }
        None => resolve(RawConfig::default(), &overrides),
    }
}

/// Loader that takes an explicit path and overrides.
pub fn load_from(path: &Path, overrides: &Overrides<'_>) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    resolve(parsed, overrides)
}

fn resolve(parsed: RawConfig, overrides: &Overrides<'_>) -> Result<Config, AppError> {
    let log_level = overrides.log_level.unwrap_or(&parsed.log.level);
    // EnvFilter would read a misspelt level as a target name and go quiet.
    logger::parse_level(log_level)
        .map_err(|e| AppError::Config(format!("[log] level: {e}")))?;

    Ok(Config {
        log_level: log_level.to_string(),
        log_file: parsed.log.file.as_deref().map(expand_home),
        manifest_path: parsed.manifest.path.as_deref().map(expand_home),
        upstage: UpstageConfig {
            api_base_url: overrides
                .api_base_url
                .unwrap_or(&parsed.upstage.api_base_url)
                .to_string(),
            timeout_seconds: parsed.upstage.timeout_seconds,
            api_key: overrides.api_key.map(str::to_string),
        },
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_TOML: &str = r#"
[upstage]
api_base_url = "http://localhost:8000/v1/solar"
timeout_seconds = 15

[log]
level = "debug"
file = "~/upstage.log"

[manifest]
path = "exports.toml"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_full_config() {
        let f = write_toml(FULL_TOML);
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.upstage.api_base_url, "http://localhost:8000/v1/solar");
        assert_eq!(cfg.upstage.timeout_seconds, 15);
        assert_eq!(cfg.manifest_path, Some(PathBuf::from("exports.toml")));
        assert!(cfg.upstage.api_key.is_none());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let f = write_toml("");
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert_eq!(cfg.log_level, "warn");
        assert_eq!(cfg.upstage, UpstageConfig::default());
        assert!(cfg.log_file.is_none());
        assert!(cfg.manifest_path.is_none());
    }

    #[test]
    fn overrides_beat_file() {
        let f = write_toml(FULL_TOML);
        let overrides = Overrides {
            log_level: Some("trace"),
            api_base_url: Some("https://proxy.example/v1/solar"),
            api_key: Some("up_test"),
        };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.log_level, "trace");
        assert_eq!(cfg.upstage.api_base_url, "https://proxy.example/v1/solar");
        assert_eq!(cfg.upstage.api_key.as_deref(), Some("up_test"));
    }

    #[test]
    fn api_key_in_toml_is_ignored() {
        let f = write_toml("[upstage]\napi_key = \"leaked\"\n");
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert!(cfg.upstage.api_key.is_none());
    }

    #[test]
    fn log_file_tilde_expands() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let f = write_toml(FULL_TOML);
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        let log_file = cfg.log_file.unwrap();
        assert!(log_file.starts_with(&home));
        assert!(log_file.ends_with("upstage.log"));
    }

    #[test]
    fn absolute_path_unchanged() {
        assert_eq!(expand_home("/absolute/path"), PathBuf::from("/absolute/path"));
        assert_eq!(expand_home("relative/path"), PathBuf::from("relative/path"));
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(Path::new("/nonexistent/config.toml"), &Overrides::default());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("config error"));
    }

    #[test]
    fn misspelt_log_level_is_config_error() {
        let f = write_toml("[log]\nlevel = \"verbose\"\n");
        let err = load_from(f.path(), &Overrides::default()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("verbose"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn misspelt_log_level_override_is_config_error() {
        let f = write_toml(FULL_TOML);
        let overrides = Overrides { log_level: Some("debugg"), ..Overrides::default() };
        assert!(matches!(load_from(f.path(), &overrides), Err(AppError::Config(_))));
    }

    #[test]
    fn malformed_toml_errors() {
        let f = write_toml("[upstage\n");
        let msg = load_from(f.path(), &Overrides::default()).unwrap_err().to_string();
        assert!(msg.contains("parse error"));
    }
}
