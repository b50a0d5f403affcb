//! Engine option sets

use crate::utils::config::ShimSettings;
use crate::utils::error::EngineError;
use std::path::PathBuf;

/// Options shared by metadata extraction and download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Validate TLS certificates
    pub certificate_check: bool,
    /// Keep going when a single item fails
    pub ignore_item_errors: bool,
    pub timeout_seconds: u64,
    pub retries: u32,
    pub cookies_path: Option<PathBuf>,
    pub audio_post_process: Option<AudioPostProcess>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            certificate_check: false,
            ignore_item_errors: true,
            timeout_seconds: 30,
            retries: 3,
            cookies_path: None,
            audio_post_process: None,
        }
    }
}

impl EngineOptions {
    pub fn from_settings(settings: &ShimSettings, cookies_path: Option<PathBuf>) -> Self {
        Self {
            timeout_seconds: settings.socket_timeout,
            retries: settings.retries,
            cookies_path,
            ..Default::default()
        }
    }

    /// Check preconditions before handing the options to an engine
    pub fn validate(&self) -> Result<(), EngineError> {
        if let Some(cookies) = &self.cookies_path {
            if !cookies.is_file() {
                return Err(EngineError::CookiesNotFound(cookies.clone()));
            }
        }
        Ok(())
    }
}

/// Audio extraction stage run after the raw stream is fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPostProcess {
    pub codec: String,
    pub quality: String,
    pub container: String,
}

impl AudioPostProcess {
    pub fn mp3() -> Self {
        Self {
            codec: "mp3".to_string(),
            quality: "192".to_string(),
            container: "mp3".to_string(),
        }
    }
}

/// Options for a single-item download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub engine: EngineOptions,
    pub format_id: String,
    /// Output template; always an absolute file path here
    pub output: PathBuf,
    pub playlist: bool,
}
