//! Pick an image, recognize its text on-device, copy the result.
//!
//! The core is [`ProcessingController`]: it owns the session's
//! [`ProcessingState`] and moves it between `Idle`, `Processing` and `Results`
//! while recognition runs off the interactive path. Image selection,
//! recognition, and the clipboard are pluggable through [`ImageSource`],
//! [`TextRecognizer`], and [`ClipboardSink`].

pub mod clipboard;
pub mod config;
pub mod console;
pub mod controller;
pub mod engine;
pub mod engines;
pub mod error;
pub mod image_source;
pub mod notice;
pub mod state;

pub use clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard};
pub use config::Config;
pub use controller::{ControllerHandle, ProcessingController};
pub use engine::{EngineRecognizer, OcrEngine, OcrResult, TextRecognizer};
pub use engines::EngineRegistry;
pub use error::{ErrorKind, OcrError};
pub use image_source::{ImageSource, PromptImageSource};
pub use notice::{Notice, NoticeReceiver};
pub use state::{Generation, ImageRef, Phase, ProcessingState, Screen};
