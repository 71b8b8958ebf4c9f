//! Clipboard sinks for recognized text

use std::sync::{Arc, Mutex};

pub trait ClipboardSink: Send {
    /// Place `text` on the clipboard. Never fails from the caller's point of view.
    fn set_text(&mut self, text: &str);
}

/// The system clipboard via arboard
///
/// Opened on first use and kept for the rest of the session; on X11 and
/// Wayland the copied text only stays available while the handle is alive.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn clipboard(&mut self) -> Option<&mut arboard::Clipboard> {
        if self.inner.is_none() {
            match arboard::Clipboard::new() {
                Ok(clipboard) => self.inner = Some(clipboard),
                Err(e) => {
                    tracing::warn!("Failed to access clipboard: {}", e);
                    return None;
                }
            }
        }
        self.inner.as_mut()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) {
        let Some(clipboard) = self.clipboard() else {
            return;
        };

        match clipboard.set_text(text) {
            Ok(()) => tracing::debug!("Copied {} chars to clipboard", text.len()),
            Err(e) => {
                tracing::warn!("Failed to write clipboard: {}", e);
                // The handle may be stale (e.g. display server restarted)
                self.inner = None;
            }
        }
    }
}

/// Keeps the last copied text in memory
///
/// Clones share the same contents, so a caller can hand one clone to the
/// controller and read back through another.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.contents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) {
        *self.lock() = Some(text.to_string());
    }
}
