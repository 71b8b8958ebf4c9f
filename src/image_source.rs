//! Ways for the user to choose an image
//!
//! Every source resolves to `None` when the user backs out. Errors from the
//! underlying prompt or dialog are logged and treated the same way.

use crate::state::ImageRef;
use futures::future::{BoxFuture, FutureExt};
use std::path::PathBuf;

/// Extensions offered by the pickers
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff"];

pub trait ImageSource: Send + Sync {
    /// Ask the user for an image; `None` means cancelled
    fn pick(&self) -> BoxFuture<'static, Option<ImageRef>>;
}

/// Terminal prompt asking for a file path
#[derive(Debug, Default, Clone)]
pub struct PromptImageSource;

impl ImageSource for PromptImageSource {
    fn pick(&self) -> BoxFuture<'static, Option<ImageRef>> {
        async {
            let answer = tokio::task::spawn_blocking(|| {
                inquire::Text::new("Image path:")
                    .with_help_message("Esc to cancel")
                    .prompt()
            })
            .await;

            match answer {
                Ok(Ok(path)) => parse_path(&path),
                Ok(Err(
                    inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted,
                )) => None,
                Ok(Err(e)) => {
                    tracing::warn!("Image prompt failed: {}", e);
                    None
                }
                Err(e) => {
                    tracing::warn!("Image prompt task failed: {}", e);
                    None
                }
            }
        }
        .boxed()
    }
}

/// Native open-file dialog
#[cfg(feature = "file-dialog")]
#[derive(Debug, Default, Clone)]
pub struct DialogImageSource;

#[cfg(feature = "file-dialog")]
impl ImageSource for DialogImageSource {
    fn pick(&self) -> BoxFuture<'static, Option<ImageRef>> {
        async {
            let picked = tokio::task::spawn_blocking(|| {
                rfd::FileDialog::new()
                    .set_title("Select an image")
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_file()
            })
            .await;

            match picked {
                Ok(path) => path.map(ImageRef::from),
                Err(e) => {
                    tracing::warn!("File dialog task failed: {}", e);
                    None
                }
            }
        }
        .boxed()
    }
}

/// Turn a typed answer into an image reference
fn parse_path(input: &str) -> Option<ImageRef> {
    let trimmed = input.trim().trim_matches(|c| c == '"' || c == '\'');
    if trimmed.is_empty() {
        return None;
    }

    let path = match (trimmed.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(trimmed),
    };

    Some(ImageRef::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_answer_is_cancel() {
        assert_eq!(parse_path(""), None);
        assert_eq!(parse_path("   \n"), None);
        assert_eq!(parse_path("''"), None);
    }

    #[test]
    fn test_plain_path() {
        assert_eq!(parse_path(" scans/receipt.png "), Some("scans/receipt.png".into()));
    }

    #[test]
    fn test_quoted_path_from_drag_and_drop() {
        assert_eq!(
            parse_path("'/tmp/My Scans/page 1.jpg'"),
            Some("/tmp/My Scans/page 1.jpg".into())
        );
    }

    #[test]
    fn test_home_expansion() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                parse_path("~/Pictures/note.png"),
                Some(ImageRef::from(home.join("Pictures/note.png")))
            );
        }
    }
}
