//! instantdl - JSON-line front end for yt-dlp
//!
//! `instantdl info <url> [--cookies <path>]`
//! `instantdl download <url> <formatId> <outPath> <isAudio> [--cookies <path>]`
//!
//! Stdout carries only JSON lines; diagnostics go to stderr.

use anyhow::Result;
use instantdl::app;
use instantdl::extractor::YtDlpEngine;
use instantdl::output::JsonLines;
use instantdl::utils::ShimSettings;
use std::io::Write;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "INSTANTDL_LOG";

fn main() -> Result<ExitCode> {
    init_logging();

    let settings = ShimSettings::from_env();
    let engine = YtDlpEngine::locate(&settings);
    debug!("yt-dlp: {:?}", engine.ytdlp_path());

    let out = JsonLines::stdout();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let code = runtime.block_on(app::run(std::env::args().skip(1), &engine, &settings, &out));

    out.flush()?;
    std::io::stderr().flush()?;

    Ok(ExitCode::from(code as u8))
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
