//! Harness error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("case {case}: char argument {value:?} does not fit in one byte")]
    WideChar { case: String, value: char },
    #[error("invalid argument spec {spec:?}: {reason}")]
    InvalidArgSpec { spec: String, reason: String },
    #[error("case {case}: {reason}")]
    InvalidCase { case: String, reason: String },
}
