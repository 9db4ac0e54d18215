//! AI-backed pet-care features.
//!
//! Symptom triage, first-aid guidance, behaviour training and media analysis
//! all share one request policy: fingerprint the input, consult the shared
//! memoizer, otherwise call the provider under the surface's single-flight
//! slot, and fall back to fixed advice when a live call fails. The policy
//! lives in [`FeatureAssistant`]; what varies per feature is a
//! [`FeatureProfile`].
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod assistant;
pub mod profile;
pub mod prompts;

pub use assistant::FeatureAssistant;
pub use profile::{FeatureKind, FeatureProfile};
