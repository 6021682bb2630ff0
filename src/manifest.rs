//! Export manifest check.
//!
//! An [`ExportManifest`] is the list of public symbol names a module exposes.
//! [`verify_exports`] compares an actual list against an expected one using
//! sorted-list equality: the order of either input never matters, but
//! duplicate counts do. On failure the [`ManifestMismatch`] names exactly
//! which symbols are missing and which are unexpected.
//!
//! Loading the actual manifest is a separate step. A module (or manifest
//! file) that cannot be loaded is a [`ManifestError::Load`], never a mismatch.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// The manifest source could not be read or parsed.
    #[error("cannot load manifest from {source_name}: {reason}")]
    Load { source_name: String, reason: String },

    /// A loaded manifest contains a name that cannot be a public symbol.
    #[error("invalid export name {name:?}")]
    InvalidName { name: String },

    #[error("export manifest mismatch: {0}")]
    Mismatch(ManifestMismatch),
}

impl ManifestError {
    /// `true` for every error that kept the check from running.
    pub fn is_load_failure(&self) -> bool {
        !matches!(self, ManifestError::Mismatch(_))
    }
}

/// The difference between an actual and an expected manifest.
///
/// All three lists are sorted and free of repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestMismatch {
    /// Expected but not exported.
    pub missing: Vec<String>,
    /// Exported but not expected.
    pub unexpected: Vec<String>,
    /// Present on both sides, but a different number of times.
    pub duplicates: Vec<String>,
}

impl ManifestMismatch {
    /// Names present in exactly one of the two manifests.
    pub fn symmetric_difference(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .missing
            .iter()
            .chain(self.unexpected.iter())
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl fmt::Display for ManifestMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing: {:?}; unexpected: {:?}", self.missing, self.unexpected)?;
        if !self.duplicates.is_empty() {
            write!(f, "; duplicated: {:?}", self.duplicates)?;
        }
        Ok(())
    }
}

// ── Manifest ──────────────────────────────────────────────────────────────────

/// Public symbol names of one module, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportManifest {
    /// Module the names belong to. Informational only.
    #[serde(default)]
    pub module: String,
    pub exports: Vec<String>,
}

impl ExportManifest {
    pub fn new<I, S>(module: impl Into<String>, exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            module: module.into(),
            exports: exports.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }

    /// Names sorted lexicographically, duplicates kept.
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.exports.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn names(&self) -> BTreeSet<&str> {
        self.exports.iter().map(String::as_str).collect()
    }

    /// Names declared more than once.
    pub fn duplicates(&self) -> Vec<&str> {
        counts(&self.exports)
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(name, _)| name)
            .collect()
    }

    /// Reject names that cannot be Rust identifiers of a public item.
    pub fn validate(&self) -> Result<(), ManifestError> {
        match self.exports.iter().find(|name| !is_valid_name(name)) {
            Some(name) => Err(ManifestError::InvalidName { name: name.clone() }),
            None => Ok(()),
        }
    }

    /// Verify this manifest (as the actual side) against `expected`.
    pub fn verify_against<S: AsRef<str>>(&self, expected: &[S]) -> Result<(), ManifestMismatch> {
        verify_exports(&self.exports, expected)
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn counts<S: AsRef<str>>(names: &[S]) -> BTreeMap<&str, usize> {
    let mut map = BTreeMap::new();
    for name in names {
        *map.entry(name.as_ref()).or_insert(0) += 1;
    }
    map
}

// ── Check ─────────────────────────────────────────────────────────────────────

/// Compare two export lists by sorted-list equality.
///
/// Passes silently when both lists hold the same names the same number of
/// times. Otherwise returns the missing, unexpected, and unevenly duplicated
/// names.
pub fn verify_exports<A, E>(actual: &[A], expected: &[E]) -> Result<(), ManifestMismatch>
where
    A: AsRef<str>,
    E: AsRef<str>,
{
    let mut actual_sorted: Vec<&str> = actual.iter().map(AsRef::as_ref).collect();
    let mut expected_sorted: Vec<&str> = expected.iter().map(AsRef::as_ref).collect();
    actual_sorted.sort_unstable();
    expected_sorted.sort_unstable();

    debug!(actual = actual_sorted.len(), expected = expected_sorted.len(), "verifying exports");

    if actual_sorted == expected_sorted {
        return Ok(());
    }

    let actual_counts = counts(actual);
    let expected_counts = counts(expected);

    let missing = expected_counts
        .keys()
        .filter(|name| !actual_counts.contains_key(*name))
        .map(|name| name.to_string())
        .collect();
    let unexpected = actual_counts
        .keys()
        .filter(|name| !expected_counts.contains_key(*name))
        .map(|name| name.to_string())
        .collect();
    let duplicates = actual_counts
        .iter()
        .filter(|(name, n)| expected_counts.get(*name).is_some_and(|m| m != *n))
        .map(|(name, _)| name.to_string())
        .collect();

    let mismatch = ManifestMismatch { missing, unexpected, duplicates };
    warn!(
        missing = ?mismatch.missing,
        unexpected = ?mismatch.unexpected,
        duplicated = ?mismatch.duplicates,
        "export manifest mismatch"
    );
    Err(mismatch)
}

/// Lifecycle of a single check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckState {
    #[default]
    NotRun,
    Passed,
    Failed(ManifestMismatch),
}

/// A check bound to a fixed expected manifest.
///
/// Re-running it with the same actual manifest always lands in the same state.
#[derive(Debug, Clone)]
pub struct ManifestCheck {
    expected: ExportManifest,
    state: CheckState,
}

impl ManifestCheck {
    pub fn new(expected: ExportManifest) -> Self {
        Self { expected, state: CheckState::NotRun }
    }

    pub fn expected(&self) -> &ExportManifest {
        &self.expected
    }

    pub fn state(&self) -> &CheckState {
        &self.state
    }

    pub fn is_passed(&self) -> bool {
        self.state == CheckState::Passed
    }

    /// Compare `actual` to the expected manifest and record the outcome.
    pub fn run(&mut self, actual: &ExportManifest) -> &CheckState {
        self.state = match actual.verify_against(&self.expected.exports) {
            Ok(()) => {
                info!(module = %actual.module, exports = actual.len(), "export manifest matches");
                CheckState::Passed
            }
            Err(mismatch) => CheckState::Failed(mismatch),
        };
        &self.state
    }

    /// Run and convert the outcome into a `Result`.
    pub fn verify(&mut self, actual: &ExportManifest) -> Result<(), ManifestError> {
        match self.run(actual) {
            CheckState::Failed(mismatch) => Err(ManifestError::Mismatch(mismatch.clone())),
            _ => Ok(()),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parse a TOML manifest: `module = "..."` and `exports = [...]`.
pub fn parse_manifest_toml(text: &str, source_name: &str) -> Result<ExportManifest, ManifestError> {
    let manifest: ExportManifest = toml::from_str(text).map_err(|e| ManifestError::Load {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })?;
    manifest.validate()?;
    Ok(manifest)
}

/// Parse a JSON manifest with the same shape as the TOML form.
pub fn parse_manifest_json(text: &str, source_name: &str) -> Result<ExportManifest, ManifestError> {
    let manifest: ExportManifest = serde_json::from_str(text).map_err(|e| ManifestError::Load {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })?;
    manifest.validate()?;
    Ok(manifest)
}

/// Read a manifest file. `.json` files are JSON, everything else is TOML.
pub fn load_manifest(path: &Path) -> Result<ExportManifest, ManifestError> {
    let source_name = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| ManifestError::Load {
        source_name: source_name.clone(),
        reason: e.to_string(),
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let manifest = if is_json {
        parse_manifest_json(&text, &source_name)?
    } else {
        parse_manifest_toml(&text, &source_name)?
    };
    debug!(path = %source_name, exports = manifest.len(), "manifest loaded");
    Ok(manifest)
}
