//! Response memoization for the AI-backed features.
//!
//! A single [`ResponseMemoizer`] is built by the composition root and shared
//! by handle with every feature. Entries expire lazily after a fixed TTL and
//! are keyed by a namespace-tagged [`Fingerprint`] of the normalized input.
//!
//! # Submodules
//!
//! - `clock`: Injectable time source so expiry can be tested deterministically.
//! - `fingerprint`: Key derivation for text and media requests.
//! - `memoizer`: The TTL-bounded store itself.
//! - `models`: Cache entry and statistics types.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod clock;
pub mod fingerprint;
pub mod memoizer;
pub mod models;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fingerprint::{Fingerprint, MediaKeyStrategy};
pub use memoizer::ResponseMemoizer;
pub use models::{CacheEntry, CacheStats};
