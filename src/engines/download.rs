//! Model and traineddata fetching shared by the engines

#![cfg_attr(
    not(any(feature = "engine-ocrs", feature = "engine-leptess")),
    allow(dead_code)
)]

use crate::error::OcrError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Ensure `filename` exists under `dir`, fetching it from `url` if needed
pub(crate) fn ensure_downloaded(
    url: &str,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, OcrError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        OcrError::InitializationError(format!("Failed to create cache directory: {}", e))
    })?;

    let path = dir.join(filename);

    if path.exists() {
        tracing::info!("Using cached {} from {:?}", filename, path);
        return Ok(path);
    }

    tracing::info!("Downloading {} (this may take a moment)...", filename);
    download_file(url, &path)?;
    tracing::info!("Downloaded {} to {:?}", filename, path);

    Ok(path)
}

/// Download a file from URL to path using ureq
fn download_file(url: &str, path: &Path) -> Result<(), OcrError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| OcrError::InitializationError(format!("Failed to download {}: {}", url, e)))?;

    // A failed transfer must not leave a partial file in the cache
    let buffer = response.into_body().read_to_vec().map_err(|e| {
        OcrError::InitializationError(format!("Failed to read response body: {}", e))
    })?;

    let mut file = File::create(path).map_err(|e| {
        OcrError::InitializationError(format!("Failed to create {}: {}", path.display(), e))
    })?;

    file.write_all(&buffer).map_err(|e| {
        OcrError::InitializationError(format!("Failed to write {}: {}", path.display(), e))
    })?;

    Ok(())
}
