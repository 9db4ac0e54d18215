// Places models - locations, service categories, TomTom response shapes
// Author: kelexine (https://github.com/kelexine)

use crate::error::{AssistError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A resolved address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

/// Kind of pet service to search for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    #[default]
    Vet,
    Groomer,
    Park,
}

impl ServiceKind {
    /// TomTom category query for this kind
    pub fn category(&self) -> &'static str {
        match self {
            ServiceKind::Vet => "veterinarian",
            ServiceKind::Groomer => "pet-service",
            ServiceKind::Park => "pet-park",
        }
    }
}

impl FromStr for ServiceKind {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vet" => Ok(ServiceKind::Vet),
            "groomer" => Ok(ServiceKind::Groomer),
            "park" => Ok(ServiceKind::Park),
            other => Err(AssistError::InvalidInput(format!("Unknown service kind: {}", other))),
        }
    }
}

/// Reject latitude/longitude pairs outside the WGS84 range
pub fn check_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AssistError::InvalidInput("Coordinates out of range".to_string()));
    }
    Ok(())
}

/// A nearby pet service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetService {
    pub name: String,
    pub address: String,
    pub distance_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// TomTom search response (fuzzy, category and POI searches share it)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub position: Position,
    #[serde(default)]
    pub address: Address,
    pub poi: Option<Poi>,
    /// Distance from the search centre in metres
    pub dist: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub freeform_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Poi {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
}

/// Great-circle distance in kilometres
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Round to one decimal place
pub fn round_km(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}
