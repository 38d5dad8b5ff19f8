use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// Output format other than `json` or `csv`.
    #[error("unsupported format '{0}': use 'json' or 'csv'")]
    UnsupportedFormat(String),

    /// Service name with no message table in the catalog.
    #[error("unknown service '{0}'")]
    UnknownService(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed csv at {path}: {reason}")]
    MalformedCsv { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_keeps_source_kind() {
        let err: SimError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        match err {
            SimError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unsupported_format_message_names_value() {
        let err = SimError::UnsupportedFormat("xml".to_string());
        assert!(err.to_string().contains("'xml'"));
    }
}
