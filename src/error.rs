//! Error types for the codeshelf library.

use thiserror::Error;

/// All errors that can occur within the codeshelf library.
#[derive(Debug, Error)]
pub enum ShelfError {
    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A collection or export document could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The key-value store rejected a read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Import text was not a valid export document.
    #[error("Malformed import: {0}")]
    MalformedImport(String),

    /// A snippet or category id did not match anything.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No clipboard tool could take the text.
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Convenience alias that pins the error type to [`ShelfError`].
pub type Result<T> = std::result::Result<T, ShelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_import_names_the_problem() {
        let e = ShelfError::MalformedImport("missing field `categories`".into());
        assert!(e.to_string().contains("categories"));
    }

    #[test]
    fn json_errors_convert() {
        let err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let e: ShelfError = err.into();
        assert!(matches!(e, ShelfError::Json(_)));
    }
}
