// Feature profiles - per-feature namespace, model and fallback advice
// Author: kelexine (https://github.com/kelexine)

use super::prompts;
use crate::config::GeminiConfig;
use crate::error::{AssistError, Result};
use crate::vision::MediaKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The AI-backed features of the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Symptom triage chat
    Symptoms,
    /// Emergency first-aid guidance chat
    FirstAid,
    /// Behaviour training chat
    Behavior,
    /// Photo and video analysis
    Media,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 4] = [
        FeatureKind::Symptoms,
        FeatureKind::FirstAid,
        FeatureKind::Behavior,
        FeatureKind::Media,
    ];

    /// Namespace tag used in cache fingerprints
    pub fn namespace(&self) -> &'static str {
        match self {
            FeatureKind::Symptoms => "symptoms",
            FeatureKind::FirstAid => "firstaid",
            FeatureKind::Behavior => "behavior",
            FeatureKind::Media => "media",
        }
    }

    /// Whether the feature is a text chat (as opposed to media upload)
    pub fn is_conversational(&self) -> bool {
        !matches!(self, FeatureKind::Media)
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

impl FromStr for FeatureKind {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self> {
        FeatureKind::ALL
            .into_iter()
            .find(|kind| kind.namespace() == s)
            .ok_or_else(|| AssistError::InvalidInput(format!("Unknown feature: {}", s)))
    }
}

/// Everything that differs between features' request handling.
#[derive(Debug, Clone)]
pub struct FeatureProfile {
    pub kind: FeatureKind,
    /// Model hint passed to the provider
    pub model: String,
    /// Advice shown instead of the answer when the provider fails
    pub fallback_message: String,
    /// Replies are rendered as emergency guidance
    pub flags_emergency: bool,
    /// Prompt preamble for text questions; `None` for upload-only features
    pub instructions: Option<&'static str>,
}

impl FeatureProfile {
    /// Default profile for `kind`, taking model names from the Gemini config
    pub fn for_kind(kind: FeatureKind, gemini: &GeminiConfig) -> Self {
        let (model, fallback_message, flags_emergency, instructions) = match kind {
            FeatureKind::Symptoms => (
                &gemini.text_model,
                "I apologize, but I encountered an error analyzing the symptoms. \
                 Please try again or rephrase your description.",
                false,
                Some(prompts::SYMPTOMS_INSTRUCTIONS),
            ),
            FeatureKind::FirstAid => (
                &gemini.text_model,
                "I apologize, but I encountered an error providing first aid guidance. \
                 Please try again or, if this is an emergency, contact your veterinarian immediately.",
                true,
                Some(prompts::FIRST_AID_INSTRUCTIONS),
            ),
            FeatureKind::Behavior => (
                &gemini.text_model,
                "I apologize, but I encountered an error analyzing the behavior. \
                 Please try again or consult with a professional trainer for complex issues.",
                false,
                Some(prompts::BEHAVIOR_INSTRUCTIONS),
            ),
            FeatureKind::Media => (
                &gemini.media_model,
                "Failed to analyze the image. Please try again.",
                false,
                None,
            ),
        };

        Self {
            kind,
            model: model.clone(),
            fallback_message: fallback_message.to_string(),
            flags_emergency,
            instructions,
        }
    }

    pub fn namespace(&self) -> &'static str {
        self.kind.namespace()
    }

    /// Fallback wording for a media failure, naming what was uploaded
    pub fn media_fallback(&self, kind: MediaKind) -> String {
        self.fallback_message.replace("image", kind.noun())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_round_trip() {
        for kind in FeatureKind::ALL {
            assert_eq!(kind.namespace().parse::<FeatureKind>().unwrap(), kind);
        }
        assert!("grooming".parse::<FeatureKind>().is_err());
    }

    #[test]
    fn test_fallbacks_are_distinct() {
        let gemini = GeminiConfig::default();
        let messages: Vec<String> = FeatureKind::ALL
            .iter()
            .map(|k| FeatureProfile::for_kind(*k, &gemini).fallback_message)
            .collect();

        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        assert!(messages[1].contains("veterinarian"));
    }

    #[test]
    fn test_profile_models() {
        let gemini = GeminiConfig::default();
        assert_eq!(FeatureProfile::for_kind(FeatureKind::Media, &gemini).model, "gemini-1.5-flash");
        assert!(FeatureProfile::for_kind(FeatureKind::FirstAid, &gemini).flags_emergency);
    }

    #[test]
    fn test_only_chat_features_have_instructions() {
        let gemini = GeminiConfig::default();
        for kind in FeatureKind::ALL {
            let profile = FeatureProfile::for_kind(kind, &gemini);
            assert_eq!(profile.instructions.is_some(), kind.is_conversational(), "{}", kind);
        }
    }

    #[test]
    fn test_media_fallback_names_kind() {
        let profile = FeatureProfile::for_kind(FeatureKind::Media, &GeminiConfig::default());
        assert_eq!(
            profile.media_fallback(MediaKind::Video),
            "Failed to analyze the video. Please try again."
        );
    }
}
