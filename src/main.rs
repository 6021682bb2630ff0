//! `upstage-manifest`: verify the crate's export manifest from the shell.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI args
//!   3. Load config
//!   4. Resolve effective log level (CLI `-v` flags > RUST_LOG > config)
//!   5. Init logger once
//!   6. List exports, or load the expected manifest and run the check
//!
//! Exit codes: 0 pass, 1 manifest mismatch, 2 config or load failure.

use std::path::PathBuf;

use tracing::{error, info};

use langchain_upstage::error::AppError;
use langchain_upstage::manifest::{self, ManifestError};
use langchain_upstage::{config, exports, logger};

fn main() {
    if let Err(e) = run() {
        if let AppError::Manifest(ManifestError::Mismatch(mismatch)) = &e {
            println!("FAIL {mismatch}");
        } else {
            eprintln!("error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), AppError> {
    // Load .env if present; the file is optional.
    let _ = dotenvy::dotenv();

    let args = parse_cli_args(std::env::args().skip(1));

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    logger::init(effective_log_level, args.log_level.is_some(), config.log_file.as_deref())?;

    info!(
        configured_log_level = %config.log_level,
        effective_log_level = %effective_log_level,
        api_base_url = %config.upstage.api_base_url,
        "config loaded"
    );

    if args.list {
        let actual = exports::load()?;
        if args.json {
            let json = serde_json::to_string_pretty(&actual)
                .map_err(|e| AppError::Config(format!("cannot render manifest: {e}")))?;
            println!("{json}");
        } else {
            for name in actual.sorted() {
                println!("{name}");
            }
        }
        return Ok(());
    }

    let manifest_path = args.manifest_path.or(config.manifest_path);
    let expected = match &manifest_path {
        Some(path) => manifest::load_manifest(path).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "expected manifest failed to load");
        })?,
        None => exports::expected(),
    };

    let count = expected.len();
    exports::check_against(expected)?;
    println!("ok {count} exports match");
    Ok(())
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
    manifest_path: Option<PathBuf>,
    list: bool,
    json: bool,
}

fn parse_cli_args<I: IntoIterator<Item = String>>(args: I) -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;
    let mut manifest_path = None;
    let mut list = false;
    let mut json = false;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: upstage-manifest [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
                println!("  -m, --manifest <PATH>      Expected manifest file, TOML or .json (default: built-in)");
                println!("      --list                 Print the exported names instead of checking");
                println!("      --json                 Print the exported names as a JSON manifest (implies --list)");
                println!("  -v, -vv, -vvv              Increase logging verbosity");
                std::process::exit(0);
            }
            "-f" | "--config" => match iter.next() {
                Some(path) => config_path = Some(path),
                None => {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(2);
                }
            },
            "-m" | "--manifest" => match iter.next() {
                Some(path) => manifest_path = Some(PathBuf::from(path)),
                None => {
                    eprintln!("error: -m/--manifest requires a path argument");
                    std::process::exit(2);
                }
            },
            "--list" => list = true,
            "--json" => {
                json = true;
                list = true;
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            other => eprintln!("warning: ignoring unknown argument '{other}'"),
        }
    }

    CliArgs {
        log_level: logger::level_for_verbosity(verbosity),
        config_path,
        manifest_path,
        list,
        json,
    }
}
