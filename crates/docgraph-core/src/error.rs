//! Error types for Docgraph

use thiserror::Error;

/// Result type alias using Docgraph's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Docgraph error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Network errors (E100-E199)
    #[error("Network error: {0}. Check your internet connection.")]
    NetworkError(#[from] reqwest::Error),

    #[error("Entity lookup failed: {0}. Check your key with `docgraph config get enrichment.api_key`.")]
    LookupFailed(String),

    #[error("Entity lookup timed out after {0} seconds")]
    LookupTimeout(u64),

    #[error("Enrichment failed: {0}")]
    EnrichmentFailed(String),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::NetworkError(_) => "E100",
            Self::LookupFailed(_) => "E101",
            Self::LookupTimeout(_) => "E102",
            Self::EnrichmentFailed(_) => "E103",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput(_) => "E800",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::NetworkError(_) => Some("Check internet connection".to_string()),
            Self::LookupFailed(_) => Some("docgraph config get enrichment.api_key".to_string()),
            Self::LookupTimeout(_) => {
                Some("docgraph config set enrichment.timeout_secs 10".to_string())
            }
            Self::EnrichmentFailed(_) => Some("docgraph analyze --offline".to_string()),
            Self::ConfigError(_) => Some("docgraph config list".to_string()),
            Self::InvalidInput(_) => Some("Provide UTF-8 text as a file or on stdin".to_string()),
        }
    }
}
