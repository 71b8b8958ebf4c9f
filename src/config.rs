use std::path::PathBuf;
use std::time::Duration;

/// Default upper bound on a single recognition call
pub const DEFAULT_RECOGNITION_TIMEOUT: Duration = Duration::from_secs(30);

/// Session configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Engine to use; `None` picks the registry default
    pub engine: Option<String>,
    pub default_language: String,
    pub tessdata_path: Option<String>,
    /// Where downloaded models and tessdata are cached
    pub cache_dir: Option<PathBuf>,
    /// `None` waits for the engine indefinitely
    pub recognition_timeout: Option<Duration>,
}

impl Config {
    /// Resolve the model cache directory
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("textgrab")
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: None,
            default_language: "eng".to_string(),
            tessdata_path: None,
            cache_dir: None,
            recognition_timeout: Some(DEFAULT_RECOGNITION_TIMEOUT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_cache_dir_wins() {
        let config = Config {
            cache_dir: Some(PathBuf::from("/tmp/models")),
            ..Default::default()
        };
        assert_eq!(config.cache_dir(), PathBuf::from("/tmp/models"));
    }

    #[test]
    fn test_default_cache_dir_is_namespaced() {
        let config = Config::default();
        assert!(config.cache_dir().ends_with("textgrab"));
    }
}
