//! Geocoding and nearby pet-service search.
//!
//! Not memoized and not single-flight: each call goes straight to the
//! provider, and every failure collapses to one fixed "try again" message.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod client;
pub mod models;

pub use client::{TomTomClient, ADDRESS_NOT_FOUND, NEARBY_FAILED};
pub use models::{check_coordinates, Location, PetService, ServiceKind};

use crate::error::Result;
use futures::future::BoxFuture;

/// Places provider as seen by the HTTP layer
pub trait PlacesProvider: Send + Sync {
    fn resolve_address<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Location>>;

    fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        kind: ServiceKind,
    ) -> BoxFuture<'_, Result<Vec<PetService>>>;
}
