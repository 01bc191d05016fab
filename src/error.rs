use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("{url} returned status {status}")]
    UnexpectedStatus { status: StatusCode, url: String },
}

pub type Result<T> = std::result::Result<T, EtlError>;

impl EtlError {
    /// Whether this failure is a transient server error (HTTP 5xx).
    /// Only these are retried; 4xx, transport and shape errors are not.
    pub fn is_server_error(&self) -> bool {
        match self {
            EtlError::UnexpectedStatus { status, .. } => status.is_server_error(),
            EtlError::Http(e) => e.status().is_some_and(|s| s.is_server_error()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable() {
        let err = EtlError::UnexpectedStatus {
            status: StatusCode::SERVICE_UNAVAILABLE,
            url: "http://localhost/animals".into(),
        };
        assert!(err.is_server_error());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        let err = EtlError::UnexpectedStatus {
            status: StatusCode::NOT_FOUND,
            url: "http://localhost/animals".into(),
        };
        assert!(!err.is_server_error());
    }

    #[test]
    fn non_http_errors_are_not_retryable() {
        assert!(!EtlError::MissingField("items".into()).is_server_error());
        assert!(!EtlError::Config("bad config".into()).is_server_error());
    }
}
