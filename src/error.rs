use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to initialize OCR engine: {0}")]
    InitializationError(String),

    #[error("Failed to prepare image: {0}")]
    PreparationError(String),

    #[error("Failed to process image: {0}")]
    ProcessingError(String),

    #[error("Text recognition timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Unknown OCR engine: {0}")]
    UnknownEngine(String),

    #[error("Processing controller is no longer running")]
    ControllerClosed,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// How a failed processing cycle is reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The image reference could not be opened or decoded
    Preparation,
    /// The engine reported a failure, or never answered
    Recognition,
}

impl OcrError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OcrError::PreparationError(_) => ErrorKind::Preparation,
            _ => ErrorKind::Recognition,
        }
    }

    /// The bare diagnostic, without the variant prefix
    pub fn reason(&self) -> String {
        match self {
            OcrError::InitializationError(reason)
            | OcrError::PreparationError(reason)
            | OcrError::ProcessingError(reason)
            | OcrError::Internal(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preparation_is_its_own_kind() {
        let err = OcrError::PreparationError("unreadable".to_string());
        assert_eq!(err.kind(), ErrorKind::Preparation);
    }

    #[test]
    fn test_everything_else_is_recognition() {
        assert_eq!(
            OcrError::ProcessingError("x".to_string()).kind(),
            ErrorKind::Recognition
        );
        assert_eq!(
            OcrError::Timeout(Duration::from_secs(3)).kind(),
            ErrorKind::Recognition
        );
        assert_eq!(
            OcrError::Internal("join".to_string()).kind(),
            ErrorKind::Recognition
        );
    }

    #[test]
    fn test_reason_strips_prefix() {
        let err = OcrError::ProcessingError("no text found".to_string());
        assert_eq!(err.reason(), "no text found");
        assert_eq!(err.to_string(), "Failed to process image: no text found");
    }

    #[test]
    fn test_timeout_reason_mentions_duration() {
        let err = OcrError::Timeout(Duration::from_secs(30));
        assert_eq!(err.reason(), "Text recognition timed out after 30s");
    }
}
