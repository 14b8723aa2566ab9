//! Crate error type
//!
//! Frame processing never fails; errors only come from configuration,
//! malformed bridge buffers and the session registry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WallBallError {
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("malformed landmark buffer: {len} floats (expected a multiple of 4)")]
    MalformedLandmarks { len: usize },

    #[error("malformed ball candidate buffer: {len} floats (expected a multiple of 4)")]
    MalformedCandidates { len: usize },

    #[error("unknown session: {0}")]
    UnknownSession(String),
}

pub type Result<T> = std::result::Result<T, WallBallError>;

impl WallBallError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        WallBallError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
