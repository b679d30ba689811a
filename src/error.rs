use std::io;
use std::result;

/// The error type used by this crate.
///
/// Every failure surfaces as one of four kinds. Model defects are reported
/// before any byte is written; encoding and I/O failures abort mid-write and
/// leave a truncated file behind for the caller to remove.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The logical model is defective: a required record is missing, a
    /// reference dangles, a key collides, or a value fails its catalog
    /// validator.
    #[error("validation error: {0}")]
    Validation(String),
    /// A value cannot be encoded under its representation code.
    #[error("encoding error: {0}")]
    Encoding(String),
    /// The configured visible record length cannot fit a segment the format
    /// requires.
    #[error("segmentation error: {0}")]
    Segmentation(String),
    /// An underlying file-system failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub(crate) fn encoding(message: impl Into<String>) -> Self {
        Error::Encoding(message.into())
    }

    pub(crate) fn segmentation(message: impl Into<String>) -> Self {
        Error::Segmentation(message.into())
    }
}

/// The result type used by this crate.
pub type Result<T> = result::Result<T, Error>;
