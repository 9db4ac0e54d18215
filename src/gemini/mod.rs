// Gemini API client module
// Author: kelexine (https://github.com/kelexine)

mod client;
pub mod models;

pub use client::GeminiClient;
pub use models::InlineData;

use crate::error::Result;
use futures::future::BoxFuture;

/// One call to the generative-AI provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Model hint (e.g. `gemini-1.5-pro`)
    pub model: String,
    /// Full instruction text
    pub prompt: String,
    /// Optional inline media sent alongside the prompt
    pub media: Option<InlineData>,
}

/// The AI provider as seen by the features: prompt in, text out.
///
/// Calls may take seconds and may fail with a transport or provider error.
pub trait AiProvider: Send + Sync {
    fn submit(&self, request: ProviderRequest) -> BoxFuture<'_, Result<String>>;
}

impl<P: AiProvider + ?Sized> AiProvider for std::sync::Arc<P> {
    fn submit(&self, request: ProviderRequest) -> BoxFuture<'_, Result<String>> {
        (**self).submit(request)
    }
}
