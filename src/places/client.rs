// TomTom Search client - geocoding and nearby pet services
// Author: kelexine (https://github.com/kelexine)

use super::models::{haversine_km, round_km, Location, PetService, SearchResponse, ServiceKind};
use super::PlacesProvider;
use crate::config::PlacesConfig;
use crate::error::{AssistError, Result};
use crate::metrics;
use crate::utils::logging::sanitize;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, warn};

pub const ADDRESS_NOT_FOUND: &str = "Address not found. Please try again.";
pub const NEARBY_FAILED: &str = "Failed to fetch nearby services. Please try again.";

/// Client for TomTom's Search API.
pub struct TomTomClient {
    http_client: Client,
    config: PlacesConfig,
}

impl TomTomClient {
    pub fn new(config: &PlacesConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AssistError::Config(
                "places.api_key is not set (PETCARE__PLACES__API_KEY)".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .use_rustls_tls()
            .build()
            .map_err(|e| AssistError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Resolve free-form address text to coordinates (best match only)
    pub async fn search_location(&self, query: &str) -> Result<Location> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AssistError::InvalidInput("Please enter an address.".to_string()));
        }

        let url = format!(
            "{}/search/{}.json",
            self.base_url(),
            urlencoding::encode(query)
        );
        let response = self
            .get(&url, &[("limit", "1".to_string())])
            .await
            .map_err(|e| failure("geocode", ADDRESS_NOT_FOUND, &e.to_string()))?;

        let result = response.results.into_iter().next().ok_or_else(|| {
            failure("geocode", ADDRESS_NOT_FOUND, &format!("no results for {:?}", query))
        })?;

        metrics::record_places_call("geocode", true);
        Ok(Location {
            latitude: result.position.lat,
            longitude: result.position.lon,
            address: result
                .address
                .freeform_address
                .unwrap_or_else(|| query.to_string()),
        })
    }

    /// Find pet services of `kind` around a point, nearest first
    pub async fn search_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        kind: ServiceKind,
    ) -> Result<Vec<PetService>> {
        let url = format!("{}/categorySearch/{}.json", self.base_url(), kind.category());
        let params = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("radius", self.config.radius_meters.to_string()),
            ("limit", self.config.limit.to_string()),
        ];

        let response = self
            .get(&url, &params)
            .await
            .map_err(|e| failure("nearby", NEARBY_FAILED, &e.to_string()))?;
        metrics::record_places_call("nearby", true);

        let mut services: Vec<PetService> = response
            .results
            .into_iter()
            .filter_map(|result| {
                let poi = result.poi?;
                let name = poi.name.filter(|n| !n.trim().is_empty())?;
                let distance_km = match result.dist {
                    Some(metres) => round_km(metres / 1000.0),
                    None => round_km(haversine_km(
                        latitude,
                        longitude,
                        result.position.lat,
                        result.position.lon,
                    )),
                };
                Some(PetService {
                    name,
                    address: result
                        .address
                        .freeform_address
                        .unwrap_or_else(|| "No address available".to_string()),
                    distance_km,
                    phone: poi.phone,
                    url: poi.url,
                })
            })
            .collect();

        services.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        debug!("Found {} {:?} services", services.len(), kind);
        Ok(services)
    }

    fn base_url(&self) -> &str {
        self.config.api_base_url.trim_end_matches('/')
    }

    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<SearchResponse> {
        let response = self
            .http_client
            .get(url)
            .query(&[("key", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("TomTom API error: HTTP {} - {}", status, sanitize(&body));
            return Err(AssistError::Internal(format!("HTTP {}", status)));
        }

        Ok(response.json::<SearchResponse>().await?)
    }
}

/// Record and log a failed places call, keeping only `message` for the user
fn failure(operation: &str, message: &str, detail: &str) -> AssistError {
    metrics::record_places_call(operation, false);
    warn!("Places {} failed: {}", operation, sanitize(detail));
    AssistError::places(message)
}

impl PlacesProvider for TomTomClient {
    fn resolve_address<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Location>> {
        self.search_location(text).boxed()
    }

    fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        kind: ServiceKind,
    ) -> BoxFuture<'_, Result<Vec<PetService>>> {
        self.search_nearby(latitude, longitude, kind).boxed()
    }
}
