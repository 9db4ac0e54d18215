// Conversational surface - append-only turn log plus its single-flight slot
// Author: kelexine (https://github.com/kelexine)

use super::superseder::{Delivery, RequestSuperseder, RequestToken};
use crate::features::FeatureKind;
use chrono::{DateTime, Utc};
use futures::future::AbortRegistration;
use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// What kind of content a turn carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnKind {
    /// Regular message (user input or provider answer)
    Message,
    /// Fixed fallback shown when the provider failed
    Advisory,
}

/// One entry in a surface's transcript. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub kind: TurnKind,
    /// Feature-specific classification: reply rendered as emergency guidance
    pub emergency: bool,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), TurnKind::Message, false)
    }

    pub fn assistant(content: impl Into<String>, emergency: bool) -> Self {
        Self::new(Role::Assistant, content.into(), TurnKind::Message, emergency)
    }

    pub fn advisory(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into(), TurnKind::Advisory, false)
    }

    fn new(role: Role, content: String, kind: TurnKind, emergency: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            timestamp: Utc::now(),
            kind,
            emergency,
        }
    }
}

/// Status flags for the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SurfaceStatus {
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Serializable view of a surface
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceSnapshot {
    pub feature: FeatureKind,
    pub turns: Vec<ConversationTurn>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SurfaceSnapshot {
    /// View of a surface that has not been opened yet
    pub fn empty(feature: FeatureKind) -> Self {
        Self {
            feature,
            turns: Vec::new(),
            is_loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    turns: Vec<ConversationTurn>,
    status: SurfaceStatus,
}

/// One independent conversational feature instance.
///
/// Owns its transcript and its request slot. Assistant turns are only
/// appended through [`complete`](Self::complete), so a superseded request can
/// never add to the transcript.
#[derive(Debug)]
pub struct Surface {
    feature: FeatureKind,
    superseder: RequestSuperseder,
    state: Mutex<SurfaceState>,
}

impl Surface {
    pub fn new(feature: FeatureKind) -> Self {
        Self {
            feature,
            superseder: RequestSuperseder::new(),
            state: Mutex::new(SurfaceState::default()),
        }
    }

    pub fn feature(&self) -> FeatureKind {
        self.feature
    }

    /// Start a request, superseding any pending one, and mark the surface loading.
    ///
    /// `user_turn` is appended under the same lock as the supersession, so no
    /// older request can complete between the new question and its slot.
    pub fn begin(&self, user_turn: Option<ConversationTurn>) -> (RequestToken, AbortRegistration) {
        let mut state = self.state.lock();
        if let Some(turn) = user_turn {
            state.turns.push(turn);
        }
        let pair = self.superseder.begin_request();
        state.status = SurfaceStatus {
            is_loading: true,
            error: None,
        };
        pair
    }

    /// Complete a request with the assistant turn it produced.
    ///
    /// Returns [`Delivery::Discarded`] and leaves the surface untouched when
    /// `token` has been superseded.
    pub fn complete(&self, token: &RequestToken, turn: ConversationTurn) -> Delivery<ConversationTurn> {
        let mut state = self.state.lock();
        let delivery = self.superseder.complete_request(token, turn);
        if let Delivery::Delivered(turn) = &delivery {
            state.turns.push(turn.clone());
            state.status.is_loading = false;
        }
        delivery
    }

    /// Record a user-facing error without touching the transcript
    pub fn fail(&self, token: &RequestToken, message: impl Into<String>) -> Delivery<String> {
        let mut state = self.state.lock();
        let delivery = self.superseder.complete_request(token, message.into());
        if let Delivery::Delivered(message) = &delivery {
            state.status = SurfaceStatus {
                is_loading: false,
                error: Some(message.clone()),
            };
        }
        delivery
    }

    /// Abort whatever is in flight (surface torn down)
    pub fn close(&self) {
        let mut state = self.state.lock();
        self.superseder.cancel();
        state.status.is_loading = false;
    }

    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.state.lock().turns.clone()
    }

    pub fn status(&self) -> SurfaceStatus {
        self.state.lock().status.clone()
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        let state = self.state.lock();
        SurfaceSnapshot {
            feature: self.feature,
            turns: state.turns.clone(),
            is_loading: state.status.is_loading,
            error: state.status.error.clone(),
        }
    }
}
