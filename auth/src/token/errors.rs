use thiserror::Error;

/// Error type for token operations.
///
/// Validation failures distinguish malformed, expired, and signature-invalid
/// tokens so callers can log the reason; request handling treats all three
/// the same way (reject).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token subject must not be empty")]
    EmptySubject,

    #[error("Token is expired")]
    Expired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
