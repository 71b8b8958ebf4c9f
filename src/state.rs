//! Processing state and the transitions that are allowed on it
//!
//! [`StateMachine`] is the only thing that mutates a [`ProcessingState`]. It is
//! deliberately synchronous: the controller task feeds it commands and
//! completions in arrival order, and every completion carries the
//! [`Generation`] it was issued under so that superseded cycles are dropped.

use crate::error::OcrError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque handle to a user-selected image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageRef(PathBuf);

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for ImageRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageRef {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for ImageRef {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Which view is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Home,
    Results,
}

/// The three observable states of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Processing,
    Results,
}

/// Full state of one session, published as a whole snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProcessingState {
    pub screen: Screen,
    pub image_ref: Option<ImageRef>,
    pub extracted_text: String,
    pub is_processing: bool,
}

impl ProcessingState {
    pub fn phase(&self) -> Phase {
        match (self.screen, self.is_processing) {
            (Screen::Results, _) => Phase::Results,
            (Screen::Home, true) => Phase::Processing,
            (Screen::Home, false) => Phase::Idle,
        }
    }

    fn idle() -> Self {
        Self::default()
    }
}

/// Sequence token identifying one processing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What applying a recognition completion did
#[derive(Debug)]
pub enum Outcome {
    /// Moved to `Results`
    Recognized,
    /// Moved back to `Idle`; the error is handed back for reporting
    Failed(OcrError),
    /// The cycle was superseded; state untouched
    Stale,
}

#[derive(Debug, Default)]
pub struct StateMachine {
    state: ProcessingState,
    last_generation: u64,
    in_flight: Option<Generation>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ProcessingState {
        &self.state
    }

    /// Generation of the authoritative in-flight cycle, if any
    pub fn in_flight(&self) -> Option<Generation> {
        self.in_flight
    }

    /// Start a cycle for `image`, replacing whatever was in flight
    pub fn begin(&mut self, image: ImageRef) -> Generation {
        self.last_generation += 1;
        let generation = Generation(self.last_generation);
        self.in_flight = Some(generation);
        self.state = ProcessingState {
            screen: Screen::Home,
            image_ref: Some(image),
            extracted_text: String::new(),
            is_processing: true,
        };
        generation
    }

    /// Apply the result of the cycle started under `generation`
    pub fn complete(
        &mut self,
        generation: Generation,
        result: Result<String, OcrError>,
    ) -> Outcome {
        if self.in_flight != Some(generation) {
            return Outcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(text) => {
                self.state.extracted_text = text;
                self.state.is_processing = false;
                self.state.screen = Screen::Results;
                Outcome::Recognized
            }
            Err(e) => {
                self.state = ProcessingState::idle();
                Outcome::Failed(e)
            }
        }
    }

    /// Back to `Idle`; any in-flight cycle becomes stale
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.state = ProcessingState::idle();
    }
}
