use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} responded with status {status}: {body}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Loggly token is not configured")]
    MissingToken,

    #[error("failed to serialize log entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("transport worker is no longer running")]
    WorkerGone,
}

pub type Result<T> = std::result::Result<T, TransportError>;
