//! Shim configuration

use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

pub const ENV_YTDLP: &str = "INSTANTDL_YTDLP";
pub const ENV_SOCKET_TIMEOUT: &str = "INSTANTDL_SOCKET_TIMEOUT";
pub const ENV_RETRIES: &str = "INSTANTDL_RETRIES";

/// Settings applied to every engine invocation
#[derive(Debug, Clone)]
pub struct ShimSettings {
    /// Explicit yt-dlp executable, bypassing lookup
    pub ytdlp_path: Option<PathBuf>,

    /// Socket timeout handed to the engine (seconds)
    pub socket_timeout: u64,

    /// Transport-level retries handed to the engine
    pub retries: u32,
}

impl Default for ShimSettings {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            socket_timeout: 30,
            retries: 3,
        }
    }
}

impl ShimSettings {
    /// Load settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let ytdlp_path = lookup(ENV_YTDLP)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self {
            ytdlp_path,
            socket_timeout: parse_or(&lookup, ENV_SOCKET_TIMEOUT, defaults.socket_timeout),
            retries: parse_or(&lookup, ENV_RETRIES, defaults.retries),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}
