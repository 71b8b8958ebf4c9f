use crate::error::OcrError;
use crate::state::ImageRef;
use futures::future::{BoxFuture, FutureExt};
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;

/// OCR processing result
#[derive(Debug, Clone)]
pub struct OcrResult {
    pub text: String,
    /// Mean confidence in 0.0..=1.0, when the engine reports one
    pub confidence: Option<f32>,
}

/// Trait that all OCR engines must implement
///
/// Engines are blocking; [`EngineRecognizer`] moves them off the async runtime.
pub trait OcrEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "ocrs", "leptess")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize the text in a decoded image
    fn process_image(&self, image: &DynamicImage) -> Result<OcrResult, OcrError>;

    /// Get supported languages
    fn supported_languages(&self) -> Vec<String>;
}

/// Asynchronous recognition contract consumed by the controller
pub trait TextRecognizer: Send + Sync {
    fn name(&self) -> &str;

    /// Resolve the text in `image`. The returned future must not borrow `self`.
    fn recognize(&self, image: &ImageRef) -> BoxFuture<'static, Result<String, OcrError>>;
}

/// Runs a blocking [`OcrEngine`] on the blocking thread pool
pub struct EngineRecognizer {
    engine: Arc<dyn OcrEngine>,
}

impl EngineRecognizer {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }
}

impl TextRecognizer for EngineRecognizer {
    fn name(&self) -> &str {
        self.engine.name()
    }

    fn recognize(&self, image: &ImageRef) -> BoxFuture<'static, Result<String, OcrError>> {
        let engine = Arc::clone(&self.engine);
        let image = image.clone();

        async move {
            match tokio::task::spawn_blocking(move || recognize_blocking(engine.as_ref(), &image))
                .await
            {
                Ok(result) => result,
                Err(e) => Err(OcrError::Internal(format!("Recognition worker failed: {}", e))),
            }
        }
        .boxed()
    }
}

fn recognize_blocking(engine: &dyn OcrEngine, image_ref: &ImageRef) -> Result<String, OcrError> {
    let img = load_image(image_ref.path())?;

    tracing::debug!(
        "Recognizing {} ({}x{}) with {}",
        image_ref,
        img.width(),
        img.height(),
        engine.name()
    );

    let result = engine.process_image(&img)?;

    match result.confidence {
        Some(confidence) => tracing::info!(
            "Recognized {} chars from {}, confidence: {:.2}",
            result.text.len(),
            image_ref,
            confidence
        ),
        None => tracing::info!("Recognized {} chars from {}", result.text.len(), image_ref),
    }

    Ok(result.text)
}

/// Open and decode the referenced image file
pub fn load_image(path: &Path) -> Result<DynamicImage, OcrError> {
    image::open(path).map_err(|e| {
        OcrError::PreparationError(format!("Failed to load {}: {}", path.display(), e))
    })
}
