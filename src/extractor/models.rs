//! Data structures for media information
//!
//! `Raw*` types mirror the engine's JSON; `MediaInfo` and `FormatDescriptor`
//! are what the shim prints.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::debug;

/// Engine metadata, as emitted by `yt-dlp --dump-single-json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMediaInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub duration: Option<Number>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub extractor: Option<String>,
    #[serde(default)]
    pub extractor_key: Option<String>,
    /// Kept untyped so one malformed entry cannot fail the whole document
    #[serde(default)]
    pub formats: Vec<Value>,
}

/// One raw stream entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    pub format_id: String,
    pub ext: String,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Kept verbatim so `60` is not echoed back as `60.0`
    #[serde(default)]
    pub fps: Option<Number>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub abr: Option<f64>,
    #[serde(default)]
    pub format_note: Option<String>,
}

/// Media information printed for `info`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaInfo {
    pub title: Option<String>,
    pub formats: Vec<FormatDescriptor>,
    pub thumbnail: Option<String>,
    pub duration: Option<Number>,
    pub webpage_url: Option<String>,
    pub platform: Option<String>,
}

/// One selectable stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatDescriptor {
    pub format_id: String,
    pub ext: String,
    pub filesize: Option<u64>,
    #[serde(flatten)]
    pub kind: FormatKind,
}

/// Video or audio attributes; never both
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FormatKind {
    Video {
        height: Option<u32>,
        fps: Option<Number>,
        vcodec: Option<String>,
        acodec: Option<String>,
        label: String,
    },
    Audio {
        abr: f64,
        acodec: Option<String>,
        label: String,
    },
}

impl FormatKind {
    pub fn label(&self) -> &str {
        match self {
            FormatKind::Video { label, .. } | FormatKind::Audio { label, .. } => label,
        }
    }
}

fn is_present_codec(codec: &Option<String>) -> bool {
    matches!(codec.as_deref(), Some(c) if c != "none")
}

/// `{height}p[@{fps}fps] ({format_note})`
pub fn video_label(height: Option<u32>, fps: Option<&Number>, format_note: Option<&str>) -> String {
    let height = height.map_or_else(|| "unknown".to_string(), |h| format!("{}p", h));
    let fps = match fps {
        Some(fps) if fps.as_f64().map_or(false, |f| f > 0.0) => format!("@{}fps", fps),
        _ => String::new(),
    };
    format!("{}{} ({})", height, fps, format_note.unwrap_or(""))
}

/// `{round(abr)}kbps`, rounding half to even
pub fn audio_label(abr: f64) -> String {
    format!("{}kbps", abr.round_ties_even() as i64)
}

impl RawFormat {
    /// Classify into a descriptor; `None` drops the entry
    pub fn into_descriptor(self) -> Option<FormatDescriptor> {
        let kind = if is_present_codec(&self.vcodec) {
            FormatKind::Video {
                label: video_label(self.height, self.fps.as_ref(), self.format_note.as_deref()),
                height: self.height,
                fps: self.fps,
                vcodec: self.vcodec,
                acodec: self.acodec,
            }
        } else if is_present_codec(&self.acodec) {
            let abr = self.abr.filter(|abr| *abr != 0.0 && abr.is_finite())?;
            FormatKind::Audio {
                label: audio_label(abr),
                abr,
                acodec: self.acodec,
            }
        } else {
            return None;
        };

        Some(FormatDescriptor {
            format_id: self.format_id,
            ext: self.ext,
            filesize: self.filesize,
            kind,
        })
    }
}

/// Build descriptors from raw entries, skipping malformed or unclassifiable ones
pub fn transform_formats(raw: Vec<Value>) -> Vec<FormatDescriptor> {
    raw.into_iter()
        .filter_map(|entry| match serde_json::from_value::<RawFormat>(entry) {
            Ok(format) => format.into_descriptor(),
            Err(e) => {
                debug!("Skipping malformed format entry: {}", e);
                None
            }
        })
        .collect()
}

impl From<RawMediaInfo> for MediaInfo {
    fn from(raw: RawMediaInfo) -> Self {
        Self {
            title: raw.title,
            formats: transform_formats(raw.formats),
            thumbnail: raw.thumbnail,
            duration: raw.duration,
            webpage_url: raw.webpage_url,
            platform: raw.extractor_key.or(raw.extractor),
        }
    }
}
