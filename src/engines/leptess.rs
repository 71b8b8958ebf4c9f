//! Leptess/Tesseract engine implementation
//!
//! Tesseract-based OCR engine. Better for noisy/messy images like phone photos.
//! Uses tesseract-static crate for static linking (no system dependencies).
//! Uses `tessdata_path` when configured, otherwise downloads tessdata on first use.

use super::download::ensure_downloaded;
use crate::config::Config;
use crate::engine::{OcrEngine, OcrResult};
use crate::error::OcrError;
use image::DynamicImage;
use tesseract_static::tesseract::Tesseract;

/// Tesseract OCR Engine
pub struct LeptessEngine {
    /// Path to tessdata directory
    tessdata_path: String,
    /// Default language for OCR
    default_language: String,
}

impl LeptessEngine {
    /// Create a new Tesseract-based OCR engine
    pub fn new(config: &Config) -> Result<Self, OcrError> {
        let default_language = config.default_language.clone();

        let tessdata_path = match &config.tessdata_path {
            Some(path) => path.clone(),
            None => download_tessdata(config, &default_language)?,
        };

        // Fail at startup rather than on the first image if tessdata is unusable
        Tesseract::new(Some(&tessdata_path), Some(&default_language)).map_err(|e| {
            OcrError::InitializationError(format!("Failed to initialize Tesseract: {}", e))
        })?;

        tracing::info!(
            "Leptess engine initialized (tessdata: {}, language: {})",
            tessdata_path,
            default_language
        );

        Ok(Self {
            tessdata_path,
            default_language,
        })
    }
}

impl OcrEngine for LeptessEngine {
    fn name(&self) -> &'static str {
        "leptess"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine - better for noisy/messy images like phone photos"
    }

    fn process_image(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let rgb_img = image.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        // BMP is always supported by leptonica
        let mut bmp_data = Vec::new();
        rgb_img
            .write_to(&mut std::io::Cursor::new(&mut bmp_data), image::ImageFormat::Bmp)
            .map_err(|e| OcrError::PreparationError(format!("Failed to convert to BMP: {}", e)))?;

        tracing::debug!(
            "Processing image: {}x{}, BMP size: {} bytes",
            width,
            height,
            bmp_data.len()
        );

        let mut tess = Tesseract::new(Some(&self.tessdata_path), Some(&self.default_language))
            .map_err(|e| OcrError::ProcessingError(format!("Failed to create Tesseract: {}", e)))?
            .set_image_from_mem(&bmp_data)
            .map_err(|e| {
                OcrError::PreparationError(format!(
                    "Failed to set image ({}x{}): {}",
                    width, height, e
                ))
            })?
            .recognize()
            .map_err(|e| OcrError::ProcessingError(format!("Failed to recognize text: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| OcrError::ProcessingError(format!("Failed to get text: {}", e)))?;

        // 0-100 scale
        let confidence = tess.mean_text_conf() as f32 / 100.0;

        Ok(OcrResult {
            text: text.trim().to_string(),
            confidence: Some(confidence),
        })
    }

    fn supported_languages(&self) -> Vec<String> {
        // Any installed traineddata works; these are the common ones
        [
            "eng", "deu", "fra", "spa", "ita", "por", "nld", "jpn", "chi_sim", "chi_tra", "kor",
            "ara", "rus",
        ]
        .iter()
        .map(|lang| lang.to_string())
        .collect()
    }
}

/// Fetch `tessdata_fast` traineddata for `language` into the cache directory
fn download_tessdata(config: &Config, language: &str) -> Result<String, OcrError> {
    let dir = config.cache_dir().join("tessdata");
    let filename = format!("{}.traineddata", language);
    let url = format!("https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}", filename);

    ensure_downloaded(&url, &dir, &filename)?;

    // Tesseract expects the directory, not the file
    dir.to_str()
        .map(|s| s.to_string())
        .ok_or_else(|| OcrError::InitializationError("Invalid tessdata path".to_string()))
}
