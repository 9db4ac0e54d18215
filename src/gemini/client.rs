// Gemini API client
// Author: kelexine (https://github.com/kelexine)

use super::models::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use super::{AiProvider, ProviderRequest};
use crate::config::GeminiConfig;
use crate::error::{AssistError, Result};
use crate::utils::logging::sanitize;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Client for the Google Gemini Generative Language API.
///
/// Authenticates with an API key header and sends single-turn
/// `generateContent` requests. No retries: a failed call is reported to the
/// caller, which shows the feature's fallback advice instead.
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client with a pooled HTTP connection.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AssistError::Config(
                "gemini.api_key is not set (PETCARE__GEMINI__API_KEY)".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()
            .map_err(|e| AssistError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created Gemini HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Get the API base_url
    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    /// Call Gemini `generateContent` and return the answer text.
    pub async fn generate_content(&self, request: ProviderRequest) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            request.model
        );
        debug!("Calling generateContent API for model: {}", request.model);

        let mut parts = vec![Part::text(request.prompt)];
        if let Some(media) = request.media {
            parts.push(Part::InlineData { inline_data: media });
        }

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.4),
                ..Default::default()
            }),
        };

        let start = Instant::now();
        let result = self.send(&url, &body).await;
        crate::metrics::record_gemini_call(
            &request.model,
            result.is_ok(),
            start.elapsed().as_secs_f64(),
        );
        result
    }

    async fn send(&self, url: &str, body: &GenerateContentRequest) -> Result<String> {
        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AssistError::Provider(format!("HTTP error: {}", sanitize(&e.to_string()))))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = Self::extract_error_message(&error_text).unwrap_or(error_text);
            error!("Gemini API error: HTTP {} - {}", status, sanitize(&message));
            return Err(match status.as_u16() {
                429 => AssistError::TooManyRequests(message),
                503 | 504 => AssistError::ServiceUnavailable(format!("Upstream unavailable: {}", message)),
                _ => AssistError::Provider(format!("HTTP {}: {}", status, message)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| AssistError::Provider(format!("Failed to read response body: {}", e)))?;

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            AssistError::Provider(format!("Response parsing error: {}", e))
        })?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(AssistError::Provider(format!("Prompt blocked: {}", reason)));
        }

        parsed
            .text()
            .ok_or_else(|| AssistError::Provider("Response contained no text".to_string()))
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(serde::Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            status: Option<String>,
        }

        let parsed: ErrorResponse = serde_json::from_str(response_text).ok()?;
        let error = parsed.error?;
        error.message.or(error.status)
    }
}

impl AiProvider for GeminiClient {
    fn submit(&self, request: ProviderRequest) -> BoxFuture<'_, Result<String>> {
        self.generate_content(request).boxed()
    }
}
