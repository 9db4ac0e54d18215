//! Conversational surfaces and single-flight request handling.
//!
//! Each surface (one feature instance for one session) keeps an append-only
//! transcript and a [`RequestSuperseder`] slot: submitting a new request
//! cancels the pending one, and only the latest request's outcome ever
//! reaches the transcript.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod conversation;
pub mod registry;
pub mod superseder;

pub use conversation::{ConversationTurn, Role, Surface, SurfaceSnapshot, SurfaceStatus, TurnKind};
pub use registry::SurfaceRegistry;
pub use superseder::{Delivery, RequestSuperseder, RequestToken};
