//! Transient, user-visible notices emitted by the controller

use crate::error::{ErrorKind, OcrError};
use std::fmt;
use tokio::sync::mpsc;

pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The picker was dismissed without choosing an image
    NoImageSelected,
    PreparationFailed(String),
    RecognitionFailed(String),
    TextCopied,
}

impl Notice {
    /// Diagnostic carried by a failure notice
    pub fn reason(&self) -> Option<&str> {
        match self {
            Notice::PreparationFailed(reason) | Notice::RecognitionFailed(reason) => {
                Some(reason.as_str())
            }
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.reason().is_some()
    }
}

impl From<&OcrError> for Notice {
    fn from(err: &OcrError) -> Self {
        match err.kind() {
            ErrorKind::Preparation => Notice::PreparationFailed(err.reason()),
            ErrorKind::Recognition => Notice::RecognitionFailed(err.reason()),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoImageSelected => write!(f, "No image selected"),
            Notice::PreparationFailed(reason) => write!(f, "Error preparing image: {}", reason),
            Notice::RecognitionFailed(reason) => write!(f, "Text recognition failed: {}", reason),
            Notice::TextCopied => write!(f, "Text copied to clipboard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_failure_maps_to_recognition_notice() {
        let err = OcrError::ProcessingError("no text found".to_string());
        let notice = Notice::from(&err);
        assert_eq!(notice, Notice::RecognitionFailed("no text found".to_string()));
        assert_eq!(notice.to_string(), "Text recognition failed: no text found");
    }

    #[test]
    fn test_unreadable_image_maps_to_preparation_notice() {
        let err = OcrError::PreparationError("not an image".to_string());
        let notice = Notice::from(&err);
        assert_eq!(notice.reason(), Some("not an image"));
        assert_eq!(notice.to_string(), "Error preparing image: not an image");
    }

    #[test]
    fn test_informational_notices_have_no_reason() {
        assert!(!Notice::NoImageSelected.is_failure());
        assert!(!Notice::TextCopied.is_failure());
        assert_eq!(Notice::NoImageSelected.to_string(), "No image selected");
    }
}
