//! Axum-based HTTP server for the pet-care assistant.
//!
//! Exposes each feature surface, media analysis and the places lookups as
//! JSON endpoints for the browser front end.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual endpoints (surfaces, media, places, health, metrics).
//! - `middleware`: Request ID tracking, CORS and per-route request counting.
//! - `routes`: Shared [`AppState`] and the router that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::SubmitReply;
pub use routes::{create_router, AppState};
