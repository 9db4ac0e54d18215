// Vision models and types
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};

/// Photo or video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl MediaKind {
    pub fn noun(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// MIME type assumed when the upload neither declares nor reveals one
    pub fn default_mime_type(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/jpeg",
            MediaKind::Video => "video/webm",
        }
    }
}

/// Media as submitted by the browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaUpload {
    /// `data:<mime>;base64,<payload>` or bare base64
    pub data: String,
    #[serde(default)]
    pub kind: MediaKind,
}

/// Supported media formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Heic,
    Mp4,
    WebM,
    QuickTime,
}

impl MediaFormat {
    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaFormat::Jpeg => "image/jpeg",
            MediaFormat::Png => "image/png",
            MediaFormat::WebP => "image/webp",
            MediaFormat::Gif => "image/gif",
            MediaFormat::Heic => "image/heic",
            MediaFormat::Mp4 => "video/mp4",
            MediaFormat::WebM => "video/webm",
            MediaFormat::QuickTime => "video/quicktime",
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            MediaFormat::Mp4 | MediaFormat::WebM | MediaFormat::QuickTime => MediaKind::Video,
            _ => MediaKind::Image,
        }
    }

    /// Try to detect format from MIME type
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(MediaFormat::Jpeg),
            "image/png" => Some(MediaFormat::Png),
            "image/webp" => Some(MediaFormat::WebP),
            "image/gif" => Some(MediaFormat::Gif),
            "image/heic" => Some(MediaFormat::Heic),
            "video/mp4" => Some(MediaFormat::Mp4),
            "video/webm" => Some(MediaFormat::WebM),
            "video/quicktime" => Some(MediaFormat::QuickTime),
            _ => None,
        }
    }
}

/// Validation limits
pub const MAX_MEDIA_SIZE_BYTES: usize = 30 * 1024 * 1024; // 30MB upload limit

/// Validate decoded media size
pub fn validate_media_size(data_len: usize) -> Result<(), String> {
    if data_len > MAX_MEDIA_SIZE_BYTES {
        return Err("File size must be less than 30MB".to_string());
    }
    Ok(())
}
