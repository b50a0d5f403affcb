pub mod models;
pub mod options;
pub mod traits;
pub mod ytdlp;

pub use models::{FormatDescriptor, FormatKind, MediaInfo, RawFormat, RawMediaInfo};
pub use options::{AudioPostProcess, DownloadOptions, EngineOptions};
pub use traits::{LogSink, MediaEngine};
pub use ytdlp::YtDlpEngine;
