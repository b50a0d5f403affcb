//! Request dispatch: parse, run one operation, report one result line

use crate::adapter;
use crate::cli::Request;
use crate::extractor::traits::MediaEngine;
use crate::output::JsonLines;
use crate::utils::config::ShimSettings;
use crate::utils::error::{ShimError, Stage};
use serde_json::json;
use tracing::error;

/// Process exit code for a successful run
pub const EXIT_OK: i32 = 0;
/// Process exit code for any failure
pub const EXIT_FAILURE: i32 = 1;

/// Run one invocation against `engine` and return the exit code.
///
/// Exactly one result line is written to `out`; engine warnings may precede it.
pub async fn run<I, S>(
    args: I,
    engine: &dyn MediaEngine,
    settings: &ShimSettings,
    out: &JsonLines,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let outcome = match Request::parse_from(args) {
        Ok(request) => execute(request, engine, settings, out).await,
        Err(e) => Err(e),
    };

    let written = match outcome {
        Ok(payload) => out.emit(&payload).map(|_| EXIT_OK),
        Err(e) => {
            if e.stage() != Stage::Usage {
                error!(stage = ?e.stage(), "{}", e);
            }
            out.emit_error(&e.to_string()).map(|_| EXIT_FAILURE)
        }
    };

    match written {
        Ok(code) => code,
        Err(e) => {
            error!("Failed to write result: {}", e);
            EXIT_FAILURE
        }
    }
}

async fn execute(
    request: Request,
    engine: &dyn MediaEngine,
    settings: &ShimSettings,
    out: &JsonLines,
) -> Result<serde_json::Value, ShimError> {
    match request {
        Request::Info { url, cookies_path } => {
            let media = adapter::info(engine, &url, cookies_path, settings, out).await?;
            serde_json::to_value(media).map_err(|e| ShimError::Unexpected(e.to_string()))
        }
        Request::Download(request) => {
            let path = adapter::download(engine, &request, settings, out).await?;
            Ok(json!({ "status": "ok", "path": path.to_string_lossy() }))
        }
    }
}
