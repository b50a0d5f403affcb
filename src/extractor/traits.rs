use crate::extractor::models::RawMediaInfo;
use crate::extractor::options::{DownloadOptions, EngineOptions};
use crate::utils::error::EngineError;
use async_trait::async_trait;

/// Receiver for engine diagnostics
pub trait LogSink: Send + Sync {
    fn debug(&self, msg: &str);
    fn warning(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Core trait for media extraction engines
///
/// The shim never looks inside the engine: it hands over an option set and
/// gets back raw metadata or a finished file.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Returns a unique identifier for this engine (e.g. "yt-dlp")
    fn id(&self) -> &'static str;

    /// Extracts metadata without downloading; `Ok(None)` means the engine
    /// produced nothing.
    async fn extract_metadata(
        &self,
        url: &str,
        options: &EngineOptions,
        log: &dyn LogSink,
    ) -> Result<Option<RawMediaInfo>, EngineError>;

    /// Downloads one item to `options.output`
    async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
        log: &dyn LogSink,
    ) -> Result<(), EngineError>;
}
