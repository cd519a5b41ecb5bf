//! Error types for rg-target.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while assembling a target.
///
/// Only the `imports` derivation can fail. A target that hits one of these
/// must be skipped; its descriptor would point the import path at the wrong
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("can't make {target} relative to {base}: one path is absolute and the other is not")]
    IncompatibleRoots {
        base: Utf8PathBuf,
        target: Utf8PathBuf,
    },

    #[error("can't make {target} relative to {base}: {base} climbs above the common prefix")]
    BaseEscapesPrefix {
        base: Utf8PathBuf,
        target: Utf8PathBuf,
    },
}

/// Result type for target assembly.
pub type Result<T> = std::result::Result<T, TargetError>;
