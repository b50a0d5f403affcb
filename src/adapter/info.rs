//! `info`: metadata extraction

use crate::extractor::models::MediaInfo;
use crate::extractor::options::EngineOptions;
use crate::extractor::traits::{LogSink, MediaEngine};
use crate::utils::config::ShimSettings;
use crate::utils::error::{EngineError, ShimError};
use std::path::PathBuf;
use tracing::{debug, info as log_info, warn};

/// Fetch metadata for `url` and shape it into `MediaInfo`
pub async fn info(
    engine: &dyn MediaEngine,
    url: &str,
    cookies_path: Option<PathBuf>,
    settings: &ShimSettings,
    log: &dyn LogSink,
) -> Result<MediaInfo, ShimError> {
    debug!("info via {} for {}", engine.id(), url);

    let options = EngineOptions::from_settings(settings, cookies_path);
    options.validate().map_err(ShimError::Extraction)?;

    let raw = match engine.extract_metadata(url, &options, log).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Err(ShimError::Extraction(EngineError::NoInfo)),
        Err(e) if e.is_reported_by_engine() => return Err(ShimError::Extraction(e)),
        Err(e) => return Err(ShimError::Unexpected(e.to_string())),
    };

    let raw_count = raw.formats.len();
    let media = MediaInfo::from(raw);
    if media.formats.len() < raw_count {
        warn!(
            "Dropped {} of {} formats without a usable type or bitrate",
            raw_count - media.formats.len(),
            raw_count
        );
    }

    log_info!("Extracted {} formats for {}", media.formats.len(), url);
    Ok(media)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::models::{FormatKind, RawMediaInfo};
    use crate::extractor::options::DownloadOptions;
    use crate::utils::error::Stage;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Silent;

    impl LogSink for Silent {
        fn debug(&self, _: &str) {}
        fn warning(&self, _: &str) {}
        fn error(&self, _: &str) {}
    }

    enum Reply {
        Data(RawMediaInfo),
        Nothing,
        Fail(fn() -> EngineError),
    }

    struct Stub {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl Stub {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MediaEngine for Stub {
        fn id(&self) -> &'static str {
            "stub"
        }

        async fn extract_metadata(
            &self,
            _url: &str,
            options: &EngineOptions,
            _log: &dyn LogSink,
        ) -> Result<Option<RawMediaInfo>, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(options.timeout_seconds, 30);
            assert_eq!(options.retries, 3);
            assert!(options.audio_post_process.is_none());
            match &self.reply {
                Reply::Data(raw) => Ok(Some(raw.clone())),
                Reply::Nothing => Ok(None),
                Reply::Fail(make) => Err(make()),
            }
        }

        async fn download(
            &self,
            _url: &str,
            _options: &DownloadOptions,
            _log: &dyn LogSink,
        ) -> Result<(), EngineError> {
            unreachable!("info never downloads")
        }
    }

    fn sample() -> RawMediaInfo {
        RawMediaInfo {
            title: Some("Sample".into()),
            thumbnail: Some("https://example.com/t.jpg".into()),
            duration: Some(serde_json::Number::from(212)),
            webpage_url: Some("https://example.com/video".into()),
            extractor_key: Some("Generic".into()),
            formats: vec![
                json!({"format_id": "137", "ext": "mp4", "vcodec": "avc1", "acodec": "none", "height": 1080, "fps": 60, "format_note": "1080p"}),
                json!({"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2", "abr": 128}),
                json!({"format_id": "139", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.5"}),
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_info_shapes_formats() {
        let engine = Stub::new(Reply::Data(sample()));
        let media = info(&engine, "https://example.com/video", None, &ShimSettings::default(), &Silent)
            .await
            .unwrap();

        assert_eq!(media.title.as_deref(), Some("Sample"));
        assert_eq!(media.platform.as_deref(), Some("Generic"));
        assert_eq!(media.formats.len(), 2);
        assert!(matches!(media.formats[0].kind, FormatKind::Video { .. }));
        assert_eq!(media.formats[1].kind.label(), "128kbps");
    }

    #[tokio::test]
    async fn test_no_data_is_extraction_failure() {
        let engine = Stub::new(Reply::Nothing);
        let err = info(&engine, "https://example.com", None, &ShimSettings::default(), &Silent)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Extraction);
        assert_eq!(
            err.to_string(),
            "Error extracting info: Could not extract video information"
        );
    }

    #[tokio::test]
    async fn test_engine_error_is_prefixed() {
        let engine = Stub::new(Reply::Fail(|| EngineError::Engine("Unsupported URL".into())));
        let err = info(&engine, "https://example.com", None, &ShimSettings::default(), &Silent)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error extracting info: Unsupported URL");
    }

    #[tokio::test]
    async fn test_adapter_failure_is_unexpected() {
        let engine = Stub::new(Reply::Fail(|| EngineError::NotInstalled));
        let err = info(&engine, "https://example.com", None, &ShimSettings::default(), &Silent)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Unexpected);
        assert!(err.to_string().starts_with("Unexpected error: "));
    }

    #[tokio::test]
    async fn test_missing_cookies_skip_the_engine() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Stub::new(Reply::Data(sample()));
        let err = info(
            &engine,
            "https://example.com",
            Some(dir.path().join("missing.txt")),
            &ShimSettings::default(),
            &Silent,
        )
        .await
        .unwrap_err();

        assert_eq!(err.stage(), Stage::Precondition);
        assert!(err.to_string().contains("Cookies file not found"));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }
}
