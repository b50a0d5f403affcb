//! Command-line grammar
//!
//! `<command> <url> [formatId outPath isAudio] [--cookies <path>]`
//!
//! Usage failures are returned as values so the caller can report them as a
//! JSON line instead of letting clap print to the terminal.

use crate::adapter::DownloadRequest;
use crate::utils::error::ShimError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const COOKIES_FLAG: &str = "--cookies";

#[derive(Debug, Parser)]
#[command(
    name = "instantdl",
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
struct Args {
    /// Netscape-format cookie file for access-restricted media
    #[arg(long, global = true, value_name = "PATH")]
    cookies: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print metadata and selectable formats
    Info { url: String },

    /// Download one format to a file
    Download {
        url: String,
        format_id: String,
        out_path: PathBuf,
        /// "true" (any case) for audio-only extraction to mp3
        is_audio: String,
    },
}

/// A fully parsed invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Info {
        url: String,
        cookies_path: Option<PathBuf>,
    },
    Download(DownloadRequest),
}

impl Request {
    /// Parse process arguments, excluding the program name
    pub fn parse_from<I, S>(args: I) -> Result<Self, ShimError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let (mut positionals, cookies) = split_cookies(args);

        if positionals.len() < 2 {
            return Err(ShimError::Usage("Not enough arguments".to_string()));
        }
        let needed = match positionals[0].as_str() {
            "info" => 2,
            "download" => 5,
            _ => return Err(ShimError::Usage("Unknown command".to_string())),
        };
        if positionals.len() < needed {
            return Err(ShimError::Usage(
                "Not enough arguments for download".to_string(),
            ));
        }
        // Trailing tokens beyond the grammar are ignored
        positionals.truncate(needed);

        let argv = std::iter::once("instantdl".to_string())
            .chain(positionals)
            .chain(cookies);
        let parsed = Args::try_parse_from(argv)
            .map_err(|e| ShimError::Usage(format!("Invalid arguments: {}", first_line(&e.to_string()))))?;

        Ok(match parsed.command {
            Command::Info { url } => Request::Info {
                url,
                cookies_path: parsed.cookies,
            },
            Command::Download {
                url,
                format_id,
                out_path,
                is_audio,
            } => Request::Download(DownloadRequest {
                url,
                format_id,
                out_path,
                is_audio: is_audio.eq_ignore_ascii_case("true"),
                cookies_path: parsed.cookies,
            }),
        })
    }
}

/// Split into positional tokens and the `--cookies` tokens (flag plus value)
fn split_cookies(args: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut positionals = Vec::new();
    let mut cookies = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == COOKIES_FLAG {
            cookies.push(arg);
            cookies.extend(iter.next());
        } else if arg.starts_with("--cookies=") {
            cookies.push(arg);
        } else {
            positionals.push(arg);
        }
    }
    (positionals, cookies)
}

fn first_line(msg: &str) -> &str {
    msg.lines()
        .map(|l| l.trim_start_matches("error:").trim())
        .find(|l| !l.is_empty())
        .unwrap_or("")
}
