//! Terminal presentation layer
//!
//! Renders [`ProcessingState`] snapshots and notices, and turns typed
//! commands into controller calls. While a cycle is in flight the console
//! waits for it to resolve before prompting again.

use crate::controller::ControllerHandle;
use crate::error::OcrError;
use crate::notice::{Notice, NoticeReceiver};
use crate::state::{ImageRef, Phase, ProcessingState};
use anyhow::{bail, Context};
use tokio::sync::watch;

/// How a command resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Results(ProcessingState),
    Notice(Notice),
}

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `open` runs the picker, `open PATH` processes the path directly
    Open(Option<ImageRef>),
    Copy,
    Back,
    Show,
    Help,
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "open" | "o" => {
                let path = rest.trim_matches(|c| c == '"' || c == '\'');
                Self::Open((!path.is_empty()).then(|| ImageRef::from(path)))
            }
            "copy" | "c" => Self::Copy,
            "back" | "new" | "b" => Self::Back,
            "show" | "s" => Self::Show,
            "help" | "h" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            "" => return Err("Type `help` for the list of commands".to_string()),
            other => return Err(format!("Unknown command `{}`; type `help`", other)),
        };

        Ok(command)
    }
}

pub struct Console {
    handle: ControllerHandle,
    state: watch::Receiver<ProcessingState>,
    notices: NoticeReceiver,
}

impl Console {
    pub fn new(handle: ControllerHandle, notices: NoticeReceiver) -> Self {
        let state = handle.subscribe();
        Self {
            handle,
            state,
            notices,
        }
    }

    /// Process a single image and return the final state
    pub async fn run_once(
        mut self,
        image: ImageRef,
        copy: bool,
    ) -> anyhow::Result<ProcessingState> {
        self.state.borrow_and_update();
        self.handle.process_image(image)?;

        match self.settle().await? {
            Settled::Results(state) => {
                if copy {
                    self.handle.copy_result()?;
                    if let Settled::Notice(notice) = self.settle().await? {
                        eprintln!("{}", notice);
                    }
                }
                Ok(state)
            }
            Settled::Notice(notice) => bail!("{}", notice),
        }
    }

    /// Prompt for commands until the user quits
    pub async fn run_interactive(mut self) -> anyhow::Result<()> {
        print_help();

        while let Some(line) = prompt_command().await? {
            let command = match ConsoleCommand::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    eprintln!("{}", message);
                    continue;
                }
            };

            match command {
                ConsoleCommand::Open(image) => {
                    self.state.borrow_and_update();
                    match image {
                        Some(image) => self.handle.process_image(image)?,
                        None => self.handle.select_image()?,
                    }
                    self.show_outcome().await?;
                }
                ConsoleCommand::Copy => {
                    self.handle.copy_result()?;
                    self.show_outcome().await?;
                }
                ConsoleCommand::Back => {
                    self.handle.reset()?;
                    render_state(&ProcessingState::default());
                }
                ConsoleCommand::Show => render_state(&self.handle.state()),
                ConsoleCommand::Help => print_help(),
                ConsoleCommand::Quit => break,
            }
        }

        Ok(())
    }

    /// Wait for the current command to resolve into results or a notice
    pub async fn settle(&mut self) -> Result<Settled, OcrError> {
        loop {
            tokio::select! {
                notice = self.notices.recv() => {
                    return notice.map(Settled::Notice).ok_or(OcrError::ControllerClosed);
                }
                changed = self.state.changed() => {
                    changed.map_err(|_| OcrError::ControllerClosed)?;
                    let state = self.state.borrow_and_update().clone();
                    match state.phase() {
                        Phase::Results => return Ok(Settled::Results(state)),
                        Phase::Processing => render_state(&state),
                        Phase::Idle => {}
                    }
                }
            }
        }
    }

    async fn show_outcome(&mut self) -> anyhow::Result<()> {
        match self.settle().await? {
            Settled::Results(state) => render_state(&state),
            Settled::Notice(notice) => eprintln!("{}", notice),
        }
        Ok(())
    }
}

async fn prompt_command() -> anyhow::Result<Option<String>> {
    let answer = tokio::task::spawn_blocking(|| inquire::Text::new("textgrab>").prompt())
        .await
        .context("Prompt task failed")?;

    match answer {
        Ok(line) => Ok(Some(line)),
        Err(
            inquire::InquireError::OperationCanceled | inquire::InquireError::OperationInterrupted,
        ) => Ok(None),
        Err(e) => Err(e).context("Failed to read command"),
    }
}

fn render_state(state: &ProcessingState) {
    match state.phase() {
        Phase::Idle => println!("No image selected. Type `open` to choose one."),
        Phase::Processing => {
            if let Some(image) = &state.image_ref {
                eprintln!("Recognizing text in {}...", image);
            }
        }
        Phase::Results => {
            if let Some(image) = &state.image_ref {
                println!("--- Text from {} ---", image);
            }
            if state.extracted_text.is_empty() {
                println!("(no text found)");
            } else {
                println!("{}", state.extracted_text);
            }
            println!("---");
            println!("`copy` to copy, `new` for another image");
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  open [PATH]   choose an image (prompts when PATH is omitted)");
    println!("  copy          copy the extracted text");
    println!("  new, back     clear the result and start over");
    println!("  show          show the current state");
    println!("  quit          exit");
}
