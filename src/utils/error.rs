//! Error handling for instantdl

use std::path::PathBuf;
use thiserror::Error;

/// Failure raised while preparing or driving the extraction engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Cookies file not found: {}", .0.display())]
    CookiesNotFound(PathBuf),

    #[error("Could not extract video information")]
    NoInfo,

    #[error("Download completed but file not found: {}", .0.display())]
    OutputMissing(PathBuf),

    #[error("{0}")]
    Engine(String),

    #[error("yt-dlp not found. Please install yt-dlp")]
    NotInstalled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Whether the engine itself reported the failure, as opposed to the
    /// adapter failing around it.
    pub fn is_reported_by_engine(&self) -> bool {
        matches!(
            self,
            EngineError::CookiesNotFound(_) | EngineError::NoInfo | EngineError::Engine(_)
        )
    }
}

/// Stage a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Usage,
    Precondition,
    Extraction,
    Download,
    Unexpected,
}

/// Main error type for instantdl
#[derive(Debug, Error)]
pub enum ShimError {
    #[error("{0}")]
    Usage(String),

    #[error("Error extracting info: {0}")]
    Extraction(#[source] EngineError),

    #[error("Download error: Download failed: {0}")]
    Download(#[source] EngineError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ShimError {
    pub fn stage(&self) -> Stage {
        match self {
            ShimError::Usage(_) => Stage::Usage,
            ShimError::Extraction(EngineError::CookiesNotFound(_))
            | ShimError::Download(EngineError::CookiesNotFound(_)) => Stage::Precondition,
            ShimError::Extraction(_) => Stage::Extraction,
            ShimError::Download(_) => Stage::Download,
            ShimError::Unexpected(_) => Stage::Unexpected,
        }
    }
}
