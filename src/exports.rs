//! The crate's export registry.
//!
//! Rust cannot enumerate a module's public items at runtime. The actual
//! manifest comes from the same `root_exports!` declaration in `lib.rs` that
//! emits the root `pub use` lines, so adding or dropping a re-export there
//! changes what [`load`] reports. Each exported type also names itself via
//! [`Exported::EXPORT_NAME`].

use tracing::debug;

use crate::manifest::{ExportManifest, ManifestCheck, ManifestError};

/// A type that is part of the crate's public export manifest.
pub trait Exported {
    /// Name the type is exported under.
    const EXPORT_NAME: &'static str;
}

pub const MODULE_NAME: &str = "langchain_upstage";

/// The expected public surface.
pub const EXPECTED_EXPORTS: [&str; 5] = [
    "ChatUpstage",
    "UpstageEmbeddings",
    "UpstageLayoutAnalysisLoader",
    "UpstageLayoutAnalysisParser",
    "GroundednessCheck",
];

/// Names the crate root actually re-exports, in declaration order.
pub fn exported_names() -> &'static [&'static str] {
    crate::ROOT_EXPORTS
}

/// Build this crate's actual manifest.
pub fn load() -> Result<ExportManifest, ManifestError> {
    let manifest = ExportManifest::new(MODULE_NAME, exported_names().iter().copied());
    manifest.validate()?;
    debug!(module = MODULE_NAME, exports = manifest.len(), "export registry loaded");
    Ok(manifest)
}

/// The built-in expected manifest.
pub fn expected() -> ExportManifest {
    ExportManifest::new(MODULE_NAME, EXPECTED_EXPORTS)
}

/// Load the crate's manifest and verify it against [`EXPECTED_EXPORTS`].
pub fn check() -> Result<(), ManifestError> {
    check_against(expected())
}

/// Load the crate's manifest and verify it against `expected`.
pub fn check_against(expected: ExportManifest) -> Result<(), ManifestError> {
    let actual = load()?;
    ManifestCheck::new(expected).verify(&actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ChatUpstage, GroundednessCheck, UpstageEmbeddings, UpstageLayoutAnalysisLoader,
        UpstageLayoutAnalysisParser,
    };

    #[test]
    fn registry_matches_expected() {
        assert!(check().is_ok());
    }

    #[test]
    fn names_are_unique() {
        let manifest = load().unwrap();
        assert!(manifest.duplicates().is_empty());
        assert_eq!(manifest.names().len(), EXPECTED_EXPORTS.len());
    }

    #[test]
    fn type_names_agree_with_root_exports() {
        let declared = [
            ChatUpstage::EXPORT_NAME,
            UpstageEmbeddings::EXPORT_NAME,
            UpstageLayoutAnalysisLoader::EXPORT_NAME,
            UpstageLayoutAnalysisParser::EXPORT_NAME,
            GroundednessCheck::EXPORT_NAME,
        ];
        assert!(crate::manifest::verify_exports(exported_names(), &declared).is_ok());
    }

    #[test]
    fn check_against_reports_missing() {
        let expected = ExportManifest::new(MODULE_NAME, ["ChatUpstage", "UpstageReranker"]);
        match check_against(expected) {
            Err(ManifestError::Mismatch(m)) => {
                assert_eq!(m.missing, vec!["UpstageReranker"]);
                assert_eq!(m.unexpected.len(), 4);
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }
}
