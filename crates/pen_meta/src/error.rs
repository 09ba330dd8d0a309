use std::io;

use thiserror::Error;

use crate::manipulation::MetaCategory;

/// Errors that can occur while decoding a legacy manipulation payload.
///
/// Decoding is all or nothing: any of these means no manipulations were
/// produced.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Payload is empty")]
    Empty,

    #[error("Payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Payload is not a valid gzip stream: {0}")]
    Decompress(#[source] io::Error),

    #[error("Payload has no version byte")]
    MissingVersion,

    #[error("Unsupported payload version: {0}")]
    UnsupportedVersion(u8),

    #[error("Truncated or unreadable payload: {0}")]
    Io(#[from] io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {kind} value: {value}")]
    InvalidDiscriminant { kind: &'static str, value: u8 },

    #[error("Invalid {category} string field '{field}'")]
    InvalidString {
        category: MetaCategory,
        field: &'static str,
    },

    #[error("{0} unexpected trailing byte(s) after the last section")]
    TrailingBytes(usize),
}

/// Errors that can occur while writing a legacy manipulation payload.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{category} field '{field}' does not fit the binary layout")]
    FieldOverflow {
        category: MetaCategory,
        field: &'static str,
    },
}
