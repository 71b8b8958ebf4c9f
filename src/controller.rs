//! The processing controller
//!
//! A single tokio task owns the [`StateMachine`]. Commands come in from any
//! number of [`ControllerHandle`]s; picker results and recognition
//! completions are produced on other tasks and delivered back to the owning
//! task, tagged with the [`Generation`] they were started under. Observers
//! see whole [`ProcessingState`] snapshots through a `watch` channel and
//! transient [`Notice`]s through an unbounded channel.

use crate::clipboard::ClipboardSink;
use crate::config::Config;
use crate::engine::TextRecognizer;
use crate::error::OcrError;
use crate::image_source::ImageSource;
use crate::notice::{Notice, NoticeReceiver};
use crate::state::{Generation, ImageRef, Outcome, ProcessingState, StateMachine};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

#[derive(Debug)]
enum Command {
    SelectImage,
    ProcessImage(ImageRef),
    Reset,
    CopyResult,
}

enum Completion {
    Picked(Option<ImageRef>),
    Recognized {
        generation: Generation,
        result: Result<String, OcrError>,
    },
}

/// Cloneable front door to a running controller
#[derive(Clone)]
pub struct ControllerHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ProcessingState>,
}

impl ControllerHandle {
    /// Run the image source; a chosen image starts processing
    pub fn select_image(&self) -> Result<(), OcrError> {
        self.send(Command::SelectImage)
    }

    /// Start a cycle for `image`, superseding any cycle in flight
    pub fn process_image(&self, image: impl Into<ImageRef>) -> Result<(), OcrError> {
        self.send(Command::ProcessImage(image.into()))
    }

    pub fn reset(&self) -> Result<(), OcrError> {
        self.send(Command::Reset)
    }

    pub fn copy_result(&self) -> Result<(), OcrError> {
        self.send(Command::CopyResult)
    }

    /// Latest published snapshot
    pub fn state(&self) -> ProcessingState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProcessingState> {
        self.state.clone()
    }

    fn send(&self, command: Command) -> Result<(), OcrError> {
        self.commands
            .send(command)
            .map_err(|_| OcrError::ControllerClosed)
    }
}

pub struct ProcessingController {
    machine: StateMachine,
    recognizer: Arc<dyn TextRecognizer>,
    image_source: Arc<dyn ImageSource>,
    clipboard: Box<dyn ClipboardSink>,
    recognition_timeout: Option<Duration>,
    commands: mpsc::UnboundedReceiver<Command>,
    completions: mpsc::UnboundedReceiver<Completion>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    state_tx: watch::Sender<ProcessingState>,
    notices: mpsc::UnboundedSender<Notice>,
}

impl ProcessingController {
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        image_source: Arc<dyn ImageSource>,
        clipboard: Box<dyn ClipboardSink>,
        config: &Config,
    ) -> (Self, ControllerHandle, NoticeReceiver) {
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (notices, notices_rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(ProcessingState::default());

        let controller = Self {
            machine: StateMachine::new(),
            recognizer,
            image_source,
            clipboard,
            recognition_timeout: config.recognition_timeout,
            commands,
            completions,
            completions_tx,
            state_tx,
            notices,
        };
        let handle = ControllerHandle {
            commands: commands_tx,
            state,
        };

        (controller, handle, notices_rx)
    }

    /// Create a controller and run it on the current tokio runtime
    pub fn spawn(
        recognizer: Arc<dyn TextRecognizer>,
        image_source: Arc<dyn ImageSource>,
        clipboard: Box<dyn ClipboardSink>,
        config: &Config,
    ) -> (ControllerHandle, NoticeReceiver) {
        let (controller, handle, notices) = Self::new(recognizer, image_source, clipboard, config);
        tokio::spawn(controller.run());
        (handle, notices)
    }

    /// Serve commands until every handle has been dropped
    pub async fn run(mut self) {
        tracing::info!(
            "Processing controller started (engine: {}, timeout: {:?})",
            self.recognizer.name(),
            self.recognition_timeout
        );

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(completion) = self.completions.recv() => self.handle_completion(completion),
            }
        }

        tracing::info!("Processing controller stopped");
    }

    fn handle_command(&mut self, command: Command) {
        tracing::debug!("Command: {:?}", command);

        match command {
            Command::SelectImage => {
                let pick = self.image_source.pick();
                let completions = self.completions_tx.clone();
                tokio::spawn(async move {
                    let _ = completions.send(Completion::Picked(pick.await));
                });
            }
            Command::ProcessImage(image) => self.start_processing(image),
            Command::Reset => {
                self.machine.reset();
                self.publish();
            }
            Command::CopyResult => {
                self.clipboard.set_text(&self.machine.state().extracted_text);
                self.notify(Notice::TextCopied);
            }
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Picked(Some(image)) => self.start_processing(image),
            Completion::Picked(None) => self.notify(Notice::NoImageSelected),
            Completion::Recognized { generation, result } => {
                match self.machine.complete(generation, result) {
                    Outcome::Recognized => {
                        tracing::info!(
                            "Cycle {} finished with {} chars",
                            generation,
                            self.machine.state().extracted_text.len()
                        );
                        self.publish();
                    }
                    Outcome::Failed(e) => {
                        tracing::warn!("Cycle {} failed: {}", generation, e);
                        self.publish();
                        self.notify(Notice::from(&e));
                    }
                    Outcome::Stale => {
                        tracing::debug!("Dropping stale completion for cycle {}", generation);
                    }
                }
            }
        }
    }

    fn start_processing(&mut self, image: ImageRef) {
        // The recognizer must have the request before Processing is observable
        let recognition = self.recognizer.recognize(&image);
        let generation = self.machine.begin(image);
        self.publish();

        if let Some(image) = &self.machine.state().image_ref {
            tracing::info!("Cycle {} started for {}", generation, image);
        }

        let timeout = self.recognition_timeout;
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = match timeout {
                Some(limit) => tokio::time::timeout(limit, recognition)
                    .await
                    .unwrap_or_else(|_| Err(OcrError::Timeout(limit))),
                None => recognition.await,
            };
            let _ = completions.send(Completion::Recognized { generation, result });
        });
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.machine.state().clone());
    }

    fn notify(&self, notice: Notice) {
        tracing::debug!("Notice: {}", notice);
        let _ = self.notices.send(notice);
    }
}
