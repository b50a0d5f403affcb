//! The two operations the shim exposes

pub mod download;
pub mod info;

pub use download::{download, DownloadRequest};
pub use info::info;
