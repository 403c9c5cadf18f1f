use thiserror::Error;

/// Errors that can occur during speech operations.
///
/// A missing record is not an error: lookups return `Option` and deletes
/// return `bool`, leaving the HTTP layer to turn absence into a 404.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl SpeechError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
