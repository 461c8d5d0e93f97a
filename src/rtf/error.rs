//! Error types for RTF parsing.

use thiserror::Error;

/// Result type for RTF operations.
pub type RtfResult<T> = Result<T, RtfError>;

/// RTF parsing errors.
///
/// Any of these stops the parse immediately. Text committed to the document
/// before the failure stays in place.
#[derive(Debug, Error)]
pub enum RtfError {
    /// A `}` with no matching `{`
    #[error("Unmatched '}}'")]
    StackUnderflow,
    /// Saving group state failed to allocate
    #[error("Too many '{{' -- memory exhausted")]
    StackOverflow,
    /// Input ended while groups were still open
    #[error("RTF ended during an open group")]
    UnmatchedBrace,
    /// A `\'` escape was not followed by two hex digits
    #[error("Invalid hex character found in data")]
    InvalidHex,
    /// A keyword or property table entry has no matching action
    #[error("RTF table (sym or prop) invalid")]
    BadTable,
    /// Hex or binary sub-state invariant violated
    #[error("Assertion failure")]
    Assertion,
    /// Input ended in the middle of a token or binary run
    #[error("End of file reached while reading RTF")]
    EndOfFile,
    /// No font could be realized for text
    #[error("Couldn't find font for text")]
    FontNotFound,
    /// The font engine measured text with inconsistent offsets
    #[error("Font engine returned invalid character offsets")]
    InvalidOffsets,
    /// Reading the byte source failed
    #[error("RTF read error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(RtfError::StackUnderflow.to_string(), "Unmatched '}'");
        assert_eq!(
            RtfError::StackOverflow.to_string(),
            "Too many '{' -- memory exhausted"
        );
        assert_eq!(
            RtfError::EndOfFile.to_string(),
            "End of file reached while reading RTF"
        );
    }
}
