//! `download`: fetch one format to a caller-chosen path

use crate::extractor::options::{AudioPostProcess, DownloadOptions, EngineOptions};
use crate::extractor::traits::{LogSink, MediaEngine};
use crate::utils::config::ShimSettings;
use crate::utils::error::{EngineError, ShimError};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A parsed download request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub format_id: String,
    pub out_path: PathBuf,
    pub is_audio: bool,
    pub cookies_path: Option<PathBuf>,
}

/// Absolute, normalized form of `path`
pub fn resolve_output_path(path: &Path) -> Result<PathBuf, EngineError> {
    Ok(path.absolutize()?.into_owned())
}

/// Download and verify the result; returns the resolved output path
pub async fn download(
    engine: &dyn MediaEngine,
    request: &DownloadRequest,
    settings: &ShimSettings,
    log: &dyn LogSink,
) -> Result<PathBuf, ShimError> {
    run(engine, request, settings, log)
        .await
        .map_err(ShimError::Download)
}

async fn run(
    engine: &dyn MediaEngine,
    request: &DownloadRequest,
    settings: &ShimSettings,
    log: &dyn LogSink,
) -> Result<PathBuf, EngineError> {
    let output = resolve_output_path(&request.out_path)?;
    debug!("download via {} to {}", engine.id(), output.display());

    let mut engine_options = EngineOptions::from_settings(settings, request.cookies_path.clone());
    if request.is_audio {
        engine_options.audio_post_process = Some(AudioPostProcess::mp3());
    }
    engine_options.validate()?;

    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let options = DownloadOptions {
        engine: engine_options,
        format_id: request.format_id.clone(),
        output: output.clone(),
        playlist: false,
    };

    engine.download(&request.url, &options, log).await?;

    if !tokio::fs::try_exists(&output).await.unwrap_or(false) {
        return Err(EngineError::OutputMissing(output));
    }

    info!("Downloaded {} to {}", request.url, output.display());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::models::RawMediaInfo;
    use crate::utils::error::Stage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Silent;

    impl LogSink for Silent {
        fn debug(&self, _: &str) {}
        fn warning(&self, _: &str) {}
        fn error(&self, _: &str) {}
    }

    /// Records the options it receives and optionally writes the output file
    #[derive(Default)]
    struct Stub {
        write_file: bool,
        fail_with: Option<String>,
        seen: Mutex<Vec<DownloadOptions>>,
    }

    #[async_trait]
    impl MediaEngine for Stub {
        fn id(&self) -> &'static str {
            "stub"
        }

        async fn extract_metadata(
            &self,
            _url: &str,
            _options: &EngineOptions,
            _log: &dyn LogSink,
        ) -> Result<Option<RawMediaInfo>, EngineError> {
            unreachable!("download never extracts metadata")
        }

        async fn download(
            &self,
            _url: &str,
            options: &DownloadOptions,
            _log: &dyn LogSink,
        ) -> Result<(), EngineError> {
            self.seen.lock().unwrap().push(options.clone());
            if let Some(msg) = &self.fail_with {
                return Err(EngineError::Engine(msg.clone()));
            }
            if self.write_file {
                std::fs::write(&options.output, b"media")?;
            }
            Ok(())
        }
    }

    fn request(out_path: PathBuf, is_audio: bool) -> DownloadRequest {
        DownloadRequest {
            url: "https://example.com/video".into(),
            format_id: "22".into(),
            out_path,
            is_audio,
            cookies_path: None,
        }
    }

    #[tokio::test]
    async fn test_download_creates_parent_and_verifies_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/deeper/clip.mp4");
        let engine = Stub {
            write_file: true,
            ..Default::default()
        };

        let path = download(&engine, &request(out.clone(), false), &ShimSettings::default(), &Silent)
            .await
            .unwrap();

        assert_eq!(path, out);
        assert!(path.exists());

        let seen = engine.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].playlist);
        assert_eq!(seen[0].format_id, "22");
        assert!(seen[0].engine.audio_post_process.is_none());
    }

    #[tokio::test]
    async fn test_audio_requests_mp3_post_processing() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Stub {
            write_file: true,
            ..Default::default()
        };

        download(
            &engine,
            &request(dir.path().join("song.mp3"), true),
            &ShimSettings::default(),
            &Silent,
        )
        .await
        .unwrap();

        let seen = engine.seen.lock().unwrap();
        assert_eq!(seen[0].engine.audio_post_process, Some(AudioPostProcess::mp3()));
    }

    #[tokio::test]
    async fn test_missing_output_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Stub::default();

        let err = download(
            &engine,
            &request(dir.path().join("ghost.mp4"), false),
            &ShimSettings::default(),
            &Silent,
        )
        .await
        .unwrap_err();

        assert_eq!(err.stage(), Stage::Download);
        assert!(err.to_string().contains("file not found"));
        assert!(err.to_string().starts_with("Download error: Download failed: "));
    }

    #[tokio::test]
    async fn test_engine_failure_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Stub {
            fail_with: Some("Requested format is not available".into()),
            ..Default::default()
        };

        let err = download(
            &engine,
            &request(dir.path().join("x.mp4"), false),
            &ShimSettings::default(),
            &Silent,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Download error: Download failed: Requested format is not available"
        );
    }

    #[tokio::test]
    async fn test_missing_cookies_never_invoke_engine() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Stub {
            write_file: true,
            ..Default::default()
        };
        let mut req = request(dir.path().join("x.mp4"), false);
        req.cookies_path = Some(dir.path().join("cookies.txt"));

        let err = download(&engine, &req, &ShimSettings::default(), &Silent)
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Precondition);
        assert!(err.to_string().contains("Cookies file not found"));
        assert!(engine.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_output_path_normalizes() {
        let resolved = resolve_output_path(Path::new("a/./b/../clip.mp4")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("a/clip.mp4"));
    }
}
