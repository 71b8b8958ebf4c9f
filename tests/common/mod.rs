#![allow(dead_code)]

use futures::future::{BoxFuture, FutureExt};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use textgrab::{
    Config, ControllerHandle, ImageRef, ImageSource, MemoryClipboard, Notice, NoticeReceiver,
    OcrError, ProcessingController, ProcessingState, TextRecognizer,
};
use tokio::sync::oneshot;

type Reply = oneshot::Sender<Result<String, OcrError>>;

/// Recognizer whose answers are handed out by the test, in any order
#[derive(Default)]
pub struct GatedRecognizer {
    pending: Mutex<Vec<(ImageRef, Reply)>>,
}

impl GatedRecognizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer the oldest outstanding request for `image`
    pub fn resolve(&self, image: &str, result: Result<&str, OcrError>) {
        let image = ImageRef::from(image);
        let reply = {
            let mut pending = self.pending.lock().unwrap();
            let index = pending
                .iter()
                .position(|(pending_image, _)| *pending_image == image)
                .unwrap_or_else(|| panic!("no pending request for {}", image));
            pending.remove(index).1
        };
        let _ = reply.send(result.map(str::to_string));
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

impl TextRecognizer for GatedRecognizer {
    fn name(&self) -> &str {
        "gated"
    }

    fn recognize(&self, image: &ImageRef) -> BoxFuture<'static, Result<String, OcrError>> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push((image.clone(), tx));
        async move {
            rx.await
                .unwrap_or_else(|_| Err(OcrError::Internal("reply dropped".to_string())))
        }
        .boxed()
    }
}

/// Picker that replays canned answers; `None` once they run out
#[derive(Default, Clone)]
pub struct ScriptedImageSource {
    answers: Arc<Mutex<VecDeque<Option<ImageRef>>>>,
}

impl ScriptedImageSource {
    pub fn new(answers: impl IntoIterator<Item = Option<&'static str>>) -> Self {
        let answers = answers.into_iter().map(|a| a.map(ImageRef::from)).collect();
        Self {
            answers: Arc::new(Mutex::new(answers)),
        }
    }
}

impl ImageSource for ScriptedImageSource {
    fn pick(&self) -> BoxFuture<'static, Option<ImageRef>> {
        let answer = self.answers.lock().unwrap().pop_front().flatten();
        async move { answer }.boxed()
    }
}

pub struct Session {
    pub handle: ControllerHandle,
    pub notices: NoticeReceiver,
    pub clipboard: MemoryClipboard,
}

pub fn untimed() -> Config {
    Config {
        recognition_timeout: None,
        ..Default::default()
    }
}

pub fn start(
    recognizer: Arc<dyn TextRecognizer>,
    source: ScriptedImageSource,
    config: &Config,
) -> Session {
    let clipboard = MemoryClipboard::new();
    let (handle, notices) = ProcessingController::spawn(
        recognizer,
        Arc::new(source),
        Box::new(clipboard.clone()),
        config,
    );
    Session {
        handle,
        notices,
        clipboard,
    }
}

pub async fn wait_for(
    handle: &ControllerHandle,
    predicate: impl FnMut(&ProcessingState) -> bool,
) -> ProcessingState {
    let mut state = handle.subscribe();
    let snapshot = tokio::time::timeout(Duration::from_secs(5), state.wait_for(predicate))
        .await
        .expect("Timed out waiting for state")
        .expect("Controller stopped")
        .clone();
    snapshot
}

pub async fn next_notice(notices: &mut NoticeReceiver) -> Notice {
    tokio::time::timeout(Duration::from_secs(5), notices.recv())
        .await
        .expect("Timed out waiting for notice")
        .expect("Controller stopped")
}

/// Let every spawned task run until idle. Needs a paused clock.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
