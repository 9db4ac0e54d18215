//! Media payload handling for photo and video analysis.
//!
//! This module turns an uploaded data URL (or bare base64) into Gemini
//! `InlineData`, validating the encoding, the upload size limit, and that
//! the MIME type matches the declared media kind.
//!
//! # Submodules
//!
//! - `models`: Media kinds, known formats and size constraints.
//! - `payload`: Data-URL parsing, magic-byte sniffing and validation.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod models;
pub mod payload;

pub use models::{MediaFormat, MediaKind, MediaUpload};
pub use payload::parse_media;
