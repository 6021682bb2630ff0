//! Upstage integration types and the check that guards their export manifest.
//!
//! The crate root re-exports exactly the types declared in the
//! `root_exports!` invocation below; nothing else is re-exported at the root.
//! The supporting modules (`config`, `manifest`, ...) stay public for the
//! `upstage-manifest` binary. [`exports::check`] verifies the root re-exports
//! against [`exports::EXPECTED_EXPORTS`].

pub mod config;
pub mod error;
pub mod exports;
pub mod logger;
pub mod manifest;
pub mod upstage;

/// Emit the root `pub use` lines and the matching name list from one
/// declaration, so the registry cannot drift from the real re-exports.
macro_rules! root_exports {
    ($($module:ident :: $item:ident),+ $(,)?) => {
        $(pub use upstage::$module::$item;)+

        pub(crate) const ROOT_EXPORTS: &[&str] = &[$(stringify!($item)),+];
    };
}

root_exports!(
    chat::ChatUpstage,
    embeddings::UpstageEmbeddings,
    layout::UpstageLayoutAnalysisLoader,
    layout::UpstageLayoutAnalysisParser,
    groundedness::GroundednessCheck,
);
