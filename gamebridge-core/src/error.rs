use thiserror::Error;

/// Failures surfaced by a remote game service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("not connected to the game service")]
    NotConnected,
    #[error("achievement listing failed: {0}")]
    ListingFailed(String),
    #[error("game service request failed with status {code}: {message}")]
    Status { code: i32, message: String },
}

/// Errors raised while loading bridge configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
}
