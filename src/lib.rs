//! instantdl library

pub mod adapter;
pub mod app;
pub mod cli;
pub mod extractor;
pub mod output;
pub mod utils;

// Re-export main types for easier use
pub use adapter::DownloadRequest;
pub use cli::Request;
pub use extractor::{FormatDescriptor, FormatKind, MediaEngine, MediaInfo, YtDlpEngine};
pub use utils::{EngineError, ShimError, ShimSettings, Stage};
