use std::fmt;

/// Output format offered by the download endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Audio,
    Video,
}

impl Format {
    /// Value sent as `format` in the download request
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Audio => "audio",
            Format::Video => "video",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Audio => "mp3",
            Format::Video => "mp4",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of the most recently checked URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub title: String,
    /// Duration in seconds
    pub length: u64,
    pub thumbnail_url: String,
    pub available: bool,
    pub is_short: bool,
}

impl VideoInfo {
    pub fn formatted_duration(&self) -> String {
        format_duration(self.length)
    }
}

/// `M:SS`, minutes unpadded
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Parameters of a single `/download` call.
///
/// Only the option matching the format is carried: `quality` for video,
/// `bitrate` for audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub format: Format,
    pub quality: Option<String>,
    pub bitrate: Option<String>,
}

impl DownloadRequest {
    pub fn new(url: &str, format: Format, quality: &str, bitrate: &str) -> Self {
        let (quality, bitrate) = match format {
            Format::Video => (Some(quality.to_string()), None),
            Format::Audio => (None, Some(bitrate.to_string())),
        };

        Self {
            url: url.trim().to_string(),
            format,
            quality,
            bitrate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    pub title: String,
    pub request: DownloadRequest,
    pub suggested_filename: String,
}

/// Decoded preview image, RGBA8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadPhase {
    Idle,
    Preparing,
    Downloading,
    AwaitingSavePath,
    Completed,
    Cancelled,
    Failed,
}

/// Percentage of the declared length received so far.
///
/// `None` means indeterminate: no declared length, or a declared length of zero.
pub fn progress_percent(received: u64, total: Option<u64>) -> Option<u32> {
    let total = total.filter(|total| *total > 0)?;
    Some((received as f64 / total as f64 * 100.0).round() as u32)
}
