//! Error types for rs-distiller.
//!
//! Optional signal sources (title candidates, paging detection, header image)
//! never produce errors; they report "absent" so the pipeline can fall back.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTML parsing failed.
    #[error("HTML parsing failed: {0}")]
    ParseError(String),

    /// A URL supplied by the caller could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InvalidUrl("ftp://x".to_string()).to_string(),
            "Invalid URL: ftp://x"
        );
        assert_eq!(
            Error::ParseError("no root".to_string()).to_string(),
            "HTML parsing failed: no root"
        );
    }
}
