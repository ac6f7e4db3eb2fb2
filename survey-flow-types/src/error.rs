use crate::AnswerKey;

/// Error type for answer access and coercion.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("missing answer for key: {0}")]
    MissingKey(AnswerKey),

    #[error("type mismatch at key '{key}': expected {expected}, got {actual}")]
    TypeMismatch {
        key: AnswerKey,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("malformed answer key: {0}")]
    InvalidKey(String),

    #[error("not a number: {0:?}")]
    InvalidNumber(String),

    #[error("input shape does not fit this question type: {0}")]
    InvalidInput(&'static str),

    #[error("attachment payload is not valid base64: {0}")]
    InvalidPayload(String),
}
