// Feature assistant - memoized, single-flight provider calls for one feature
// Author: kelexine (https://github.com/kelexine)

use super::profile::FeatureProfile;
use super::prompts;
use crate::cache::{Fingerprint, MediaKeyStrategy, ResponseMemoizer};
use crate::error::{AssistError, Result};
use crate::gemini::{AiProvider, ProviderRequest};
use crate::metrics;
use crate::surface::{ConversationTurn, Delivery, Surface};
use crate::vision::{parse_media, MediaUpload};
use futures::future::{AbortRegistration, Abortable};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How a provider round ended
enum Outcome {
    Answer(String),
    Failed(AssistError),
    /// A newer submission cancelled this one before it finished
    Superseded,
}

/// The memoizer and superseder policy bound to one feature.
///
/// One instance exists per [`FeatureProfile`]; all of them share the same
/// process-wide [`ResponseMemoizer`] and provider.
pub struct FeatureAssistant {
    profile: FeatureProfile,
    provider: Arc<dyn AiProvider>,
    memoizer: Arc<ResponseMemoizer>,
    deadline: Duration,
    media_keys: MediaKeyStrategy,
}

impl FeatureAssistant {
    pub fn new(
        profile: FeatureProfile,
        provider: Arc<dyn AiProvider>,
        memoizer: Arc<ResponseMemoizer>,
    ) -> Self {
        Self {
            profile,
            provider,
            memoizer,
            deadline: Duration::from_secs(60),
            media_keys: MediaKeyStrategy::default(),
        }
    }

    /// Bound each provider call; an expired deadline counts as a failure
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_media_keys(mut self, strategy: MediaKeyStrategy) -> Self {
        self.media_keys = strategy;
        self
    }

    pub fn profile(&self) -> &FeatureProfile {
        &self.profile
    }

    /// Submit a text question on `surface`.
    ///
    /// Empty input is rejected before anything else happens: no user turn,
    /// no provider call, and any pending request keeps running. Otherwise the
    /// user turn is appended and the previous pending request (if any) is
    /// superseded in one step. A provider failure becomes the feature's
    /// advisory turn. A superseded submission yields [`Delivery::Discarded`].
    pub async fn ask(&self, surface: &Surface, input: &str) -> Result<Delivery<ConversationTurn>> {
        self.check_surface(surface)?;
        let instructions = self.profile.instructions.ok_or_else(|| {
            AssistError::InvalidInput(format!("{} does not accept text questions", self.profile.kind))
        })?;

        let text = input.trim();
        if text.is_empty() {
            return Err(AssistError::InvalidInput(
                "Please describe the situation before submitting.".to_string(),
            ));
        }

        let fingerprint = Fingerprint::for_text(self.profile.namespace(), text);
        let request = ProviderRequest {
            model: self.profile.model.clone(),
            prompt: prompts::text_prompt(instructions, text),
            media: None,
        };

        let (token, registration) = surface.begin(Some(ConversationTurn::user(text)));
        let (turn, failure) = match self.resolve(fingerprint, request, registration).await {
            Outcome::Answer(answer) => (
                ConversationTurn::assistant(answer, self.profile.flags_emergency),
                None,
            ),
            Outcome::Failed(e) => (
                ConversationTurn::advisory(self.profile.fallback_message.clone()),
                Some(e),
            ),
            Outcome::Superseded => return Ok(Delivery::Discarded),
        };

        let delivery = surface.complete(&token, turn);
        match (&delivery, failure) {
            (Delivery::Delivered(_), Some(e)) if e.is_provider_failure() => {
                warn!("{} request failed: {}", self.profile.namespace(), e)
            }
            (Delivery::Delivered(_), Some(e)) => {
                error!("{} request failed unexpectedly: {}", self.profile.namespace(), e)
            }
            (Delivery::Discarded, _) => {
                debug!("{} reply dropped: superseded", self.profile.namespace())
            }
            _ => {}
        }
        Ok(delivery)
    }

    /// Analyze an uploaded photo or video on `surface`.
    ///
    /// Malformed uploads are rejected up front. A provider failure sets the
    /// surface's error flag to the media fallback message and returns it as
    /// an advisory turn; it is not added to the transcript.
    pub async fn analyze_media(
        &self,
        surface: &Surface,
        upload: &MediaUpload,
    ) -> Result<Delivery<ConversationTurn>> {
        self.check_surface(surface)?;
        if self.profile.kind.is_conversational() {
            return Err(AssistError::InvalidInput(format!(
                "{} does not accept media uploads",
                self.profile.kind
            )));
        }

        let media = parse_media(upload)?;
        let fingerprint = Fingerprint::for_media(self.profile.namespace(), &media.data, self.media_keys);
        let request = ProviderRequest {
            model: self.profile.model.clone(),
            prompt: prompts::media_prompt(upload.kind),
            media: Some(media),
        };

        let (token, registration) = surface.begin(None);
        match self.resolve(fingerprint, request, registration).await {
            Outcome::Answer(answer) => Ok(surface.complete(
                &token,
                ConversationTurn::assistant(answer, self.profile.flags_emergency),
            )),
            Outcome::Failed(e) => {
                let delivery = surface
                    .fail(&token, self.profile.media_fallback(upload.kind))
                    .map(ConversationTurn::advisory);
                if delivery.is_delivered() {
                    warn!("media analysis failed: {}", e);
                }
                Ok(delivery)
            }
            Outcome::Superseded => Ok(Delivery::Discarded),
        }
    }

    /// Memoizer first; on a miss, one abortable, deadline-bounded provider call
    async fn resolve(
        &self,
        fingerprint: Fingerprint,
        request: ProviderRequest,
        registration: AbortRegistration,
    ) -> Outcome {
        let feature = self.profile.namespace();

        if let Some(entry) = self.memoizer.lookup(&fingerprint) {
            metrics::record_provider_outcome(feature, "cache_hit");
            return Outcome::Answer(entry.result);
        }

        let call = Abortable::new(self.provider.submit(request), registration);
        match tokio::time::timeout(self.deadline, call).await {
            Ok(Ok(Ok(answer))) => {
                info!("{} answer received ({} chars)", feature, answer.len());
                metrics::record_provider_outcome(feature, "success");
                self.memoizer.store(fingerprint, answer.clone());
                Outcome::Answer(answer)
            }
            Ok(Ok(Err(e))) => {
                metrics::record_provider_outcome(feature, "failure");
                Outcome::Failed(e)
            }
            Ok(Err(_aborted)) => {
                metrics::record_provider_outcome(feature, "superseded");
                Outcome::Superseded
            }
            Err(_elapsed) => {
                metrics::record_provider_outcome(feature, "timeout");
                Outcome::Failed(AssistError::Timeout(self.deadline.as_secs()))
            }
        }
    }

    fn check_surface(&self, surface: &Surface) -> Result<()> {
        if surface.feature() != self.profile.kind {
            return Err(AssistError::Internal(format!(
                "{} surface routed to {} assistant",
                surface.feature(),
                self.profile.kind
            )));
        }
        Ok(())
    }
}
