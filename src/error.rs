//! Error type for the reading entry points.
//!
//! Markup never fails to parse; only obtaining the characters can.

/// Failure while reading or decoding a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown encoding: {label}")]
    UnknownEncoding { label: String },
    #[error("Input is not valid {encoding}")]
    Malformed { encoding: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
