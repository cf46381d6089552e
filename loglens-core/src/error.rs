//! Error types for loglens-core

use thiserror::Error;

/// Main error type for the loglens-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Upload was triggered with no file selected
    #[error("no log file selected")]
    NoFileSelected,

    /// Network or server failure talking to the analysis service
    #[error("transport error: {0}")]
    Transport(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for loglens-core
pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(format!("HTTP request failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::NoFileSelected.to_string(), "no log file selected");
        let err = Error::Transport("API error (500): boom".to_string());
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
