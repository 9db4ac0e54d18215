// Media payload parsing and validation
// Author: kelexine (https://github.com/kelexine)

use super::models::{validate_media_size, MediaFormat, MediaKind, MediaUpload};
use crate::error::{AssistError, Result};
use crate::gemini::InlineData;
use base64::Engine;

/// Convert an uploaded media payload to Gemini InlineData
pub fn parse_media(upload: &MediaUpload) -> Result<InlineData> {
    let (declared_mime, data) = split_data_url(upload.data.trim())?;
    if data.is_empty() {
        return Err(AssistError::InvalidInput("Invalid media data format".to_string()));
    }

    // Decode base64 to validate and get size
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| AssistError::InvalidInput(format!("Invalid base64 media data: {}", e)))?;

    validate_media_size(decoded.len()).map_err(AssistError::InvalidInput)?;

    let mime_type = match declared_mime {
        Some(mime) => mime.to_lowercase(),
        None => detect_format(&decoded)
            .map(|f| f.mime_type().to_string())
            .unwrap_or_else(|| upload.kind.default_mime_type().to_string()),
    };

    let expected_prefix = format!("{}/", upload.kind.noun());
    if !mime_type.starts_with(&expected_prefix) {
        return Err(AssistError::InvalidInput(
            "Please upload an image or video file".to_string(),
        ));
    }

    // Unknown subtypes are passed through; Gemini decides what it accepts
    if let Some(format) = MediaFormat::from_mime_type(&mime_type) {
        if format.kind() != upload.kind {
            return Err(AssistError::InvalidInput(format!(
                "Declared {} but received {}",
                upload.kind.noun(),
                mime_type
            )));
        }
    }

    // Gemini expects base64 data as-is (no "data:...;base64," prefix)
    Ok(InlineData {
        mime_type,
        data: data.to_string(),
    })
}

/// Split `data:<mime>;base64,<payload>` into its MIME type and payload.
/// Bare base64 yields no MIME type.
fn split_data_url(input: &str) -> Result<(Option<&str>, &str)> {
    let Some(rest) = input.strip_prefix("data:") else {
        return Ok((None, input));
    };

    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| AssistError::InvalidInput("Invalid media data format".to_string()))?;

    let mime = if mime.is_empty() { None } else { Some(mime) };
    Ok((mime, payload))
}

/// Detect format from magic bytes at start of media data
fn detect_format(data: &[u8]) -> Option<MediaFormat> {
    if data.len() < 12 {
        return None;
    }

    if data.starts_with(b"\xFF\xD8\xFF") {
        Some(MediaFormat::Jpeg)
    } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some(MediaFormat::Png)
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some(MediaFormat::Gif)
    } else if data.starts_with(b"RIFF") && data[8..12] == *b"WEBP" {
        Some(MediaFormat::WebP)
    } else if data.starts_with(b"\x1A\x45\xDF\xA3") {
        Some(MediaFormat::WebM)
    } else if &data[4..8] == b"ftyp" {
        match &data[8..12] {
            b"heic" | b"heix" => Some(MediaFormat::Heic),
            b"qt  " => Some(MediaFormat::QuickTime),
            _ => Some(MediaFormat::Mp4),
        }
    } else {
        None
    }
}
