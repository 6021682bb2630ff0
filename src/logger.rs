//! Logging setup for the `upstage-manifest` binary.
//!
//! Logs go to stderr, or are appended to a file, so stdout carries only the
//! check report. Call [`init`] once, after config is loaded.

use std::fs::OpenOptions;
use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Install the global subscriber.
///
/// `cli_level` is `true` when `level` came from `-v` flags: it then beats
/// `RUST_LOG`. A configured level only applies when `RUST_LOG` is unset or
/// unparsable.
pub fn init(level: &str, cli_level: bool, log_file: Option<&Path>) -> Result<(), AppError> {
    let filter = filter_for(level, cli_level)?;
    let writer = writer_for(log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

fn filter_for(level: &str, cli_level: bool) -> Result<EnvFilter, AppError> {
    let level_filter = parse_level(level)?;
    if cli_level {
        return Ok(EnvFilter::default().add_directive(level_filter.into()));
    }
    Ok(EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_filter.into())))
}

fn writer_for(log_file: Option<&Path>) -> Result<BoxMakeWriter, AppError> {
    let Some(path) = log_file else {
        return Ok(BoxMakeWriter::new(std::io::stderr));
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::Logger(format!("failed to open log file '{}': {e}", path.display())))?;
    Ok(BoxMakeWriter::new(file))
}

/// Parse a bare level (`error` … `trace`, or `off`).
///
/// Filter directives such as `langchain_upstage=debug` belong in `RUST_LOG`,
/// not here.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}

/// Map a `-v` count to a level. `0` means "no CLI preference".
///
///   -v → info, -vv → debug, -vvv and up → trace
pub fn level_for_verbosity(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels_parse() {
        for l in ["off", "error", "warn", "info", "debug", "trace"] {
            assert!(parse_level(l).is_ok(), "expected '{l}' to be valid");
        }
    }

    #[test]
    fn unknown_levels_error() {
        assert!(parse_level("verbose").is_err());
        assert!(parse_level("").is_err());
        assert!(parse_level("langchain_upstage=debug").is_err());
    }

    #[test]
    fn cli_level_filter_ignores_env() {
        let filter = filter_for("debug", true).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn invalid_level_never_builds_a_filter() {
        assert!(filter_for("verbose", true).is_err());
        assert!(filter_for("verbose", false).is_err());
    }

    #[test]
    fn verbosity_tiers() {
        assert_eq!(level_for_verbosity(0), None);
        assert_eq!(level_for_verbosity(1), Some("info"));
        assert_eq!(level_for_verbosity(2), Some("debug"));
        assert_eq!(level_for_verbosity(9), Some("trace"));
    }

    #[test]
    fn unopenable_log_file_errors() {
        let err = writer_for(Some(Path::new("/nonexistent/dir/upstage.log"))).err().unwrap();
        assert!(err.to_string().contains("failed to open log file"));
    }

    #[test]
    fn init_info_succeeds_or_already_init() {
        // Another test in this process may have installed the subscriber first.
        match init("info", false, None) {
            Ok(()) => {}
            Err(AppError::Logger(msg)) if msg.contains("set subscriber") => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
