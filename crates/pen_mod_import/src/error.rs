//! Error types for mod import.
//!
//! Anything that only makes a single mod unimportable (no payload, a payload
//! that does not decode) is reported as a skipped [`ImportOutcome`](crate::ImportOutcome)
//! instead. These errors are for I/O and manifest problems.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Reading the payload or reading/writing the manifest failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest is not valid JSON, or the manipulations could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The manifest parsed but its root is not a JSON object.
    #[error("Invalid manifest: {0} is not a JSON object")]
    InvalidManifest(Utf8PathBuf),

    #[error("Invalid mod directory: {0}")]
    InvalidModDir(Utf8PathBuf),
}
