use crate::rtf::RtfError;
use thiserror::Error;

/// Main error type for rtflow operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while opening or reading a document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The RTF stream could not be parsed
    #[error(transparent)]
    Rtf(#[from] RtfError),

    /// The supplied font engine implements a different capability version
    #[error("Unknown font engine version: expected {expected}, got {found}")]
    FontEngineVersion { expected: u32, found: u32 },
}

/// Result type for rtflow operations.
pub type Result<T> = std::result::Result<T, Error>;
