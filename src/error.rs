use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the codec core.
///
/// `Configuration` and `Validation` are fatal and never retried internally;
/// I/O failures propagate unchanged from the underlying stream.
#[derive(Debug, Error)]
pub enum Error {
    /// A format or swizzle descriptor was built with invalid parameters.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The in-memory bitmap disagrees with the stored header.
    #[error("image must be {expected}px in {dimension} (got {actual}px)")]
    Validation {
        dimension: &'static str,
        expected: u32,
        actual: u32,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }
}
