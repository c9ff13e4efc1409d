// Error types for certbucket
//
// Structured pipeline errors using thiserror. The binary and the command layer
// wrap these in anyhow::Result; library code returns PipelineError directly.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Main error type for pipeline operations
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Public suffix database could not be loaded
    #[error("Failed to load public suffix database from {path}: {reason}")]
    SuffixDatabase { path: String, reason: String },

    /// Certificate stream transport failure
    #[error("Certificate stream error: {details}")]
    Transport { details: String },

    /// A stream message could not be decoded
    #[error("Failed to decode stream message: {message}")]
    Decode { message: String },

    /// IDNA canonicalization failed
    #[error("IDNA conversion failed for {name}: {details}")]
    Idna { name: String, details: String },

    /// Queue was polled while empty
    #[error("Queue {queue} is empty")]
    QueueEmpty { queue: &'static str },

    /// Bucket probe failed without a classification
    #[error("Probe for {candidate} failed: {details}")]
    Probe { candidate: String, details: String },

    /// Probe exceeded its deadline
    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    /// Invalid input from user or configuration
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// File system errors
    #[error("File system error: {path}: {source}")]
    FileSystemError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Reqwest HTTP client errors
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// TOML configuration parse errors
    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML configuration render errors
    #[error("Config render error: {0}")]
    TomlRenderError(#[from] toml::ser::Error),
}

impl From<tokio_tungstenite::tungstenite::Error> for PipelineError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        PipelineError::Transport {
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_database_error() {
        let err = PipelineError::SuffixDatabase {
            path: "./public_suffix_list.dat".to_string(),
            reason: "not found".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("public suffix database"));
        assert!(msg.contains("./public_suffix_list.dat"));
    }

    #[test]
    fn test_idna_error_names_host() {
        let err = PipelineError::Idna {
            name: "bad..name".to_string(),
            details: "empty label".to_string(),
        };

        assert!(err.to_string().contains("bad..name"));
    }

    #[test]
    fn test_queue_empty_names_queue() {
        let err = PipelineError::QueueEmpty { queue: "events" };
        assert_eq!(err.to_string(), "Queue events is empty");
    }

    #[test]
    fn test_error_chain_preserved() {
        use std::error::Error;

        let err = PipelineError::FileSystemError {
            path: "config.toml".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };

        assert!(err.source().is_some());
    }
}
