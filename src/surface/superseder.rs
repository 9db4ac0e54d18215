// In-flight request superseder - single-flight slot per conversational surface
// Author: kelexine (https://github.com/kelexine)

use crate::metrics;
use futures::future::{AbortHandle, AbortRegistration};
use parking_lot::Mutex;
use tracing::debug;

/// Handle for one submitted request on a surface.
///
/// A token stays "live" until it is completed or a newer token is begun on
/// the same surface. Identity is the generation number, so the check in
/// [`RequestSuperseder::complete_request`] does not depend on whether the
/// network layer honoured the abort.
#[derive(Debug)]
pub struct RequestToken {
    generation: u64,
    abort: AbortHandle,
}

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a newer submission has asked this request to stop
    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }
}

/// Result of completing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery<T> {
    /// The token was live; the outcome goes to the presentation layer.
    Delivered(T),
    /// The token had been superseded; the outcome was dropped.
    Discarded,
}

impl<T> Delivery<T> {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered(_))
    }

    pub fn delivered(self) -> Option<T> {
        match self {
            Delivery::Delivered(value) => Some(value),
            Delivery::Discarded => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Delivery<U> {
        match self {
            Delivery::Delivered(value) => Delivery::Delivered(f(value)),
            Delivery::Discarded => Delivery::Discarded,
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    next_generation: u64,
    live: Option<(u64, AbortHandle)>,
}

/// Guarantees that only the most recent request on a surface is delivered.
#[derive(Debug, Default)]
pub struct RequestSuperseder {
    slot: Mutex<Slot>,
}

impl RequestSuperseder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new live request, cancelling the previous one if still pending.
    ///
    /// The returned registration should wrap the provider call
    /// (`futures::future::Abortable`) so a superseded call stops being polled.
    pub fn begin_request(&self) -> (RequestToken, AbortRegistration) {
        let (abort, registration) = AbortHandle::new_pair();

        let mut slot = self.slot.lock();
        if let Some((previous, handle)) = slot.live.take() {
            handle.abort();
            metrics::record_superseded();
            debug!("Request generation {} superseded", previous);
        }

        slot.next_generation += 1;
        let generation = slot.next_generation;
        slot.live = Some((generation, abort.clone()));

        (RequestToken { generation, abort }, registration)
    }

    /// Deliver `outcome` if `token` is still live, otherwise discard it.
    ///
    /// Delivery clears the slot. A superseded outcome is dropped
    /// unconditionally, error outcomes included.
    pub fn complete_request<T>(&self, token: &RequestToken, outcome: T) -> Delivery<T> {
        let mut slot = self.slot.lock();
        match &slot.live {
            Some((generation, _)) if *generation == token.generation => {
                slot.live = None;
                Delivery::Delivered(outcome)
            }
            _ => {
                debug!("Discarding outcome of superseded generation {}", token.generation);
                Delivery::Discarded
            }
        }
    }

    /// Whether a request is currently pending on this surface
    pub fn is_pending(&self) -> bool {
        self.slot.lock().live.is_some()
    }

    /// Cancel the live request without starting a new one (surface closed).
    pub fn cancel(&self) {
        if let Some((generation, handle)) = self.slot.lock().live.take() {
            handle.abort();
            debug!("Request generation {} cancelled", generation);
        }
    }
}
