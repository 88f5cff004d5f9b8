use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Connection, DNS, TLS or redirect failure before a response arrived.
    #[error("request failed: {0}")]
    Transport(reqwest::Error),

    #[error("failed to read response body: {0}")]
    BodyRead(reqwest::Error),

    /// The task analyzing a single URL panicked or was aborted.
    #[error("analysis task failed: {0}")]
    Task(String),

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
