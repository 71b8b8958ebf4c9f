use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use textgrab::console::Console;
use textgrab::{
    ClipboardSink, Config, EngineRecognizer, EngineRegistry, ImageSource, MemoryClipboard,
    ProcessingController, PromptImageSource, SystemClipboard,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "textgrab")]
#[command(about = "Pick an image, recognize its text on-device, copy the result")]
#[command(version)]
pub struct Args {
    /// Process this image and exit instead of starting the interactive prompt
    #[arg(long, short = 'i')]
    pub image: Option<PathBuf>,

    /// Copy the extracted text to the clipboard (with --image)
    #[arg(long, requires = "image")]
    pub copy: bool,

    /// Print the final state as JSON (with --image)
    #[arg(long, requires = "image")]
    pub json: bool,

    /// OCR engine to use (see --list-engines)
    #[arg(long, env = "TEXTGRAB_ENGINE")]
    pub engine: Option<String>,

    /// List the compiled-in engines and exit
    #[arg(long)]
    pub list_engines: bool,

    /// Default language for OCR (e.g., "eng", "deu", "fra")
    #[arg(long, env = "TEXTGRAB_LANGUAGE", default_value = "eng")]
    pub default_language: String,

    /// Path to tessdata directory (downloaded into the cache if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<String>,

    /// Directory for downloaded models
    #[arg(long, env = "TEXTGRAB_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Give up on a recognition after this many seconds (0 waits forever)
    #[arg(long, env = "TEXTGRAB_TIMEOUT_SECS", default_value = "30")]
    pub recognition_timeout_secs: u64,

    /// Keep copied text inside the session instead of the system clipboard
    #[arg(long)]
    pub no_clipboard: bool,

    /// Use the native file dialog to choose images
    #[cfg(feature = "file-dialog")]
    #[arg(long)]
    pub dialog: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            engine: args.engine.clone(),
            default_language: args.default_language.clone(),
            tessdata_path: args.tessdata_path.clone(),
            cache_dir: args.cache_dir.clone(),
            recognition_timeout: (args.recognition_timeout_secs > 0)
                .then(|| Duration::from_secs(args.recognition_timeout_secs)),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never mix with extracted text
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from(&args);

    tracing::info!("Starting textgrab v{}", env!("CARGO_PKG_VERSION"));

    // Model loading is blocking and may download
    let registry = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || EngineRegistry::new(&config))
            .await
            .context("Engine initialization task failed")??
    };

    if args.list_engines {
        for info in registry.info() {
            let marker = if info.name == registry.default_name() {
                " (default)"
            } else {
                ""
            };
            println!("{}{} - {}", info.name, marker, info.description);
            println!("    languages: {}", info.supported_languages.join(", "));
        }
        return Ok(());
    }

    let engine = registry.select(config.engine.as_deref())?;
    tracing::info!("Using engine: {}", engine.name());

    let clipboard: Box<dyn ClipboardSink> = if args.no_clipboard {
        Box::new(MemoryClipboard::new())
    } else {
        Box::new(SystemClipboard::new())
    };

    let (handle, notices) = ProcessingController::spawn(
        Arc::new(EngineRecognizer::new(engine)),
        image_source(&args),
        clipboard,
        &config,
    );
    let console = Console::new(handle, notices);

    match args.image {
        Some(path) => {
            let state = console.run_once(path.into(), args.copy).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                println!("{}", state.extracted_text);
            }
        }
        None => console.run_interactive().await?,
    }

    Ok(())
}

#[cfg_attr(not(feature = "file-dialog"), allow(unused_variables))]
fn image_source(args: &Args) -> Arc<dyn ImageSource> {
    #[cfg(feature = "file-dialog")]
    if args.dialog {
        return Arc::new(textgrab::image_source::DialogImageSource);
    }

    Arc::new(PromptImageSource)
}
