//! Configuration data structures for the pet-care assistant.
//!
//! This module defines the schema for the application settings: server
//! parameters, the Gemini and TomTom upstreams, the response cache, and
//! logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Upstream places (geocoding and POI search) settings.
    #[serde(default)]
    pub places: PlacesConfig,

    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheSettings,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the upstream Gemini API connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key for the public Generative Language API.
    #[serde(default)]
    pub api_key: String,

    /// Base URL for the Generative Language API.
    /// Default: `https://generativelanguage.googleapis.com/v1beta`
    #[serde(default = "default_gemini_base_url")]
    pub api_base_url: String,

    /// Connection and request timeout of the HTTP client, in seconds.
    /// Default: `120`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Deadline for a single provider call on a surface, in seconds.
    /// Default: `60`
    #[serde(default = "default_deadline")]
    pub request_deadline_seconds: u64,

    /// Model used for text features (symptoms, first aid, behaviour).
    /// Default: `gemini-1.5-pro`
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Model used for photo and video analysis.
    /// Default: `gemini-1.5-flash`
    #[serde(default = "default_media_model")]
    pub media_model: String,
}

/// Settings for the TomTom Search API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// TomTom API key.
    #[serde(default)]
    pub api_key: String,

    /// Base URL for TomTom Search.
    /// Default: `https://api.tomtom.com/search/2`
    #[serde(default = "default_places_base_url")]
    pub api_base_url: String,

    /// Search radius around the user's location in metres.
    /// Default: `5000`
    #[serde(default = "default_radius")]
    pub radius_meters: u32,

    /// Maximum number of nearby results.
    /// Default: `10`
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// How media payloads are turned into cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKeyMode {
    /// Fixed-length prefix of the encoded payload.
    Prefix,
    /// SHA-256 of the full encoded payload.
    Digest,
}

/// Settings for the response memoizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Time-to-live of a cached provider answer, in seconds.
    /// Default: `300` (5 minutes)
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,

    /// Media fingerprint strategy (`prefix` or `digest`).
    /// Default: `prefix`
    #[serde(default = "default_media_key")]
    pub media_key: MediaKeyMode,

    /// Number of payload characters used by the `prefix` strategy.
    /// Default: `100`
    #[serde(default = "default_media_prefix_len")]
    pub media_prefix_len: usize,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to mask API keys in logged URLs and bodies.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub sanitize_keys: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_gemini_base_url(),
            timeout_seconds: default_timeout(),
            request_deadline_seconds: default_deadline(),
            text_model: default_text_model(),
            media_model: default_media_model(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_places_base_url(),
            radius_meters: default_radius(),
            limit: default_limit(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            media_key: default_media_key(),
            media_prefix_len: default_media_prefix_len(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            sanitize_keys: true,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_deadline() -> u64 {
    60
}

fn default_text_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_media_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_places_base_url() -> String {
    "https://api.tomtom.com/search/2".to_string()
}

fn default_radius() -> u32 {
    5000
}

fn default_limit() -> u32 {
    10
}

fn default_ttl() -> u64 {
    300 // 5 minutes
}

fn default_media_key() -> MediaKeyMode {
    MediaKeyMode::Prefix
}

fn default_media_prefix_len() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}
