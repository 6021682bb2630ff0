//! Application-wide error types.

use thiserror::Error;

use crate::manifest::ManifestError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

impl AppError {
    /// Process exit code for the `upstage-manifest` binary.
    ///
    /// A mismatch is a failed check (1); anything that kept the check from
    /// running at all is an error (2).
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Manifest(ManifestError::Mismatch(_)) => 1,
            _ => 2,
        }
    }
}
