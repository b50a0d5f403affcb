//! yt-dlp wrapper
//!
//! Drives the `yt-dlp` executable as a child process. Option sets become
//! command-line flags, stdout carries the JSON document and stderr is
//! streamed line by line into the caller's `LogSink`.

use crate::extractor::models::RawMediaInfo;
use crate::extractor::options::{DownloadOptions, EngineOptions};
use crate::extractor::traits::{LogSink, MediaEngine};
use crate::utils::config::ShimSettings;
use crate::utils::error::EngineError;
use crate::utils::platform::find_ytdlp;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, warn};

/// Media engine backed by the yt-dlp executable
pub struct YtDlpEngine {
    ytdlp_path: Option<PathBuf>,
}

impl YtDlpEngine {
    /// Locate yt-dlp, deferring a missing binary to the first engine call
    pub fn locate(settings: &ShimSettings) -> Self {
        let ytdlp_path = find_ytdlp(settings.ytdlp_path.as_deref());
        if ytdlp_path.is_none() {
            warn!("yt-dlp not found; engine calls will fail");
        }
        Self { ytdlp_path }
    }

    /// Use a specific executable without lookup
    pub fn with_path(ytdlp_path: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: Some(ytdlp_path.into()),
        }
    }

    pub fn ytdlp_path(&self) -> Option<&Path> {
        self.ytdlp_path.as_deref()
    }

    /// Arguments for metadata-only extraction
    pub fn metadata_args(url: &str, options: &EngineOptions) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--skip-download".to_string(),
            "--quiet".to_string(),
        ];
        push_common_args(&mut args, options);
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    /// Arguments for downloading a single item
    pub fn download_args(url: &str, options: &DownloadOptions) -> Vec<String> {
        let mut args = vec![
            "--quiet".to_string(),
            "--no-progress".to_string(),
            "-f".to_string(),
            options.format_id.clone(),
            "-o".to_string(),
            options.output.to_string_lossy().into_owned(),
        ];
        if !options.playlist {
            args.push("--no-playlist".to_string());
        }
        push_common_args(&mut args, &options.engine);

        if let Some(audio) = &options.engine.audio_post_process {
            args.extend([
                "-x".to_string(),
                "--audio-format".to_string(),
                audio.codec.clone(),
                "--audio-quality".to_string(),
                audio.quality.clone(),
            ]);
        }

        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    /// Run yt-dlp, forwarding stderr to `log`; returns stdout on success
    async fn run(&self, args: Vec<String>, log: &dyn LogSink) -> Result<Vec<u8>, EngineError> {
        let ytdlp_path = self.ytdlp_path.as_ref().ok_or(EngineError::NotInstalled)?;
        debug!("Running {} {}", ytdlp_path.display(), args.join(" "));

        let mut child = AsyncCommand::new(ytdlp_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let collect_stdout = async move {
            let mut buf = Vec::new();
            if let Some(mut out) = stdout {
                out.read_to_end(&mut buf).await?;
            }
            Ok::<_, std::io::Error>(buf)
        };

        // Lines are split on raw bytes; engine output is not guaranteed UTF-8
        let forward_stderr = async move {
            let mut last_error = None;
            let mut last_line = None;
            if let Some(err) = stderr {
                let mut segments = BufReader::new(err).split(b'\n');
                while let Some(segment) = segments.next_segment().await? {
                    let line = String::from_utf8_lossy(&segment);
                    if let Some(msg) = route_stderr_line(&line, log) {
                        last_error = Some(msg);
                    }
                    let line = line.trim();
                    if !line.is_empty() {
                        last_line = Some(line.to_string());
                    }
                }
            }
            Ok::<_, std::io::Error>(last_error.or(last_line))
        };

        let (stdout, last_error) = tokio::try_join!(collect_stdout, forward_stderr)?;
        let status = child.wait().await?;

        if !status.success() {
            let msg = last_error.unwrap_or_else(|| format!("yt-dlp exited with {}", status));
            error!("yt-dlp failed: {}", msg);
            return Err(EngineError::Engine(msg));
        }

        Ok(stdout)
    }
}

fn push_common_args(args: &mut Vec<String>, options: &EngineOptions) {
    if !options.certificate_check {
        args.push("--no-check-certificates".to_string());
    }
    if options.ignore_item_errors {
        args.push("--ignore-errors".to_string());
    }
    args.push("--socket-timeout".to_string());
    args.push(options.timeout_seconds.to_string());
    args.push("--retries".to_string());
    args.push(options.retries.to_string());
    if let Some(cookies) = &options.cookies_path {
        args.push("--cookies".to_string());
        args.push(cookies.to_string_lossy().into_owned());
    }
}

/// Send one stderr line to the sink; returns the message for `ERROR:` lines
fn route_stderr_line(line: &str, log: &dyn LogSink) -> Option<String> {
    let line = line.trim_end();
    if line.is_empty() {
        return None;
    }
    if let Some(msg) = line.strip_prefix("WARNING:") {
        log.warning(msg.trim());
        None
    } else if let Some(msg) = line.strip_prefix("ERROR:") {
        let msg = msg.trim();
        log.error(msg);
        Some(msg.to_string())
    } else {
        log.debug(line);
        None
    }
}

/// Parse the metadata document; empty output or `null` means no data
pub fn parse_metadata(stdout: &[u8]) -> Result<Option<RawMediaInfo>, EngineError> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_str::<Option<RawMediaInfo>>(text)?)
}

#[async_trait]
impl MediaEngine for YtDlpEngine {
    fn id(&self) -> &'static str {
        "yt-dlp"
    }

    async fn extract_metadata(
        &self,
        url: &str,
        options: &EngineOptions,
        log: &dyn LogSink,
    ) -> Result<Option<RawMediaInfo>, EngineError> {
        debug!("Extracting metadata for URL: {}", url);
        let stdout = self.run(Self::metadata_args(url, options), log).await?;
        parse_metadata(&stdout)
    }

    async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
        log: &dyn LogSink,
    ) -> Result<(), EngineError> {
        debug!("Downloading {} as format {}", url, options.format_id);
        self.run(Self::download_args(url, options), log).await?;
        Ok(())
    }
}
