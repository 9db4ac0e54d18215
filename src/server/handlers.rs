// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::{AssistError, Result};
use crate::features::FeatureKind;
use crate::places::{check_coordinates, Location, PetService, ServiceKind};
use crate::surface::{ConversationTurn, Delivery, SurfaceSnapshot};
use crate::vision::MediaUpload;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

impl HealthCheck {
    fn ok(message: String) -> Self {
        Self {
            status: "ok".to_string(),
            message,
        }
    }
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();

    let stats = state.memoizer.stats();
    checks.insert(
        "response_cache".to_string(),
        HealthCheck::ok(format!(
            "{} entries, {} hits, {} misses",
            state.memoizer.len(),
            stats.hits,
            stats.misses
        )),
    );
    checks.insert(
        "surfaces".to_string(),
        HealthCheck::ok(format!("{} open", state.surfaces.len())),
    );
    checks.insert(
        "configuration".to_string(),
        HealthCheck::ok(format!("API base: {}", state.config.gemini.api_base_url)),
    );

    Json(HealthResponse {
        status: HealthStatus::Healthy,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn metrics_handler() -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct SubmitMessage {
    pub content: String,
}

/// Outcome of a submission as seen by the browser
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmitReply {
    Delivered { turn: ConversationTurn },
    /// A newer submission on the same surface replaced this one
    Superseded,
}

impl From<Delivery<ConversationTurn>> for SubmitReply {
    fn from(delivery: Delivery<ConversationTurn>) -> Self {
        match delivery {
            Delivery::Delivered(turn) => SubmitReply::Delivered { turn },
            Delivery::Discarded => SubmitReply::Superseded,
        }
    }
}

fn conversational_feature(raw: &str) -> Result<FeatureKind> {
    let kind: FeatureKind = raw.parse()?;
    if !kind.is_conversational() {
        return Err(AssistError::InvalidInput(format!(
            "{} is not a conversational feature",
            kind
        )));
    }
    Ok(kind)
}

/// POST /api/surfaces/:feature/:session/messages
pub async fn submit_message_handler(
    State(state): State<AppState>,
    Path((feature, session)): Path<(String, String)>,
    Json(body): Json<SubmitMessage>,
) -> Result<Json<SubmitReply>> {
    let kind = conversational_feature(&feature)?;
    let surface = state.surfaces.get_or_create(kind, &session);
    debug!("Message for {} surface of session {}", kind.namespace(), session);

    // The round runs detached so a dropped connection cannot leave the
    // surface stuck in the loading state
    let task = tokio::spawn(async move {
        let assistant = state.assistant(kind)?;
        assistant.ask(&surface, &body.content).await
    });

    let delivery = task.await.map_err(|e| {
        error!("Submission task failed: {}", e);
        AssistError::Internal("Submission task failed".to_string())
    })??;

    Ok(Json(delivery.into()))
}

/// GET /api/surfaces/:feature/:session
///
/// Reads never open a surface; an unknown session shows an empty transcript.
pub async fn surface_handler(
    State(state): State<AppState>,
    Path((feature, session)): Path<(String, String)>,
) -> Result<Json<SurfaceSnapshot>> {
    let kind: FeatureKind = feature.parse()?;
    let snapshot = match state.surfaces.get(kind, &session) {
        Some(surface) => surface.snapshot(),
        None => SurfaceSnapshot::empty(kind),
    };
    Ok(Json(snapshot))
}

/// DELETE /api/surfaces/:feature/:session
pub async fn close_surface_handler(
    State(state): State<AppState>,
    Path((feature, session)): Path<(String, String)>,
) -> Result<StatusCode> {
    let kind: FeatureKind = feature.parse()?;
    if state.surfaces.remove(kind, &session) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

/// POST /api/media/:session/analyze
pub async fn analyze_media_handler(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Json(upload): Json<MediaUpload>,
) -> Result<Json<SubmitReply>> {
    let surface = state.surfaces.get_or_create(FeatureKind::Media, &session);
    debug!("{} upload for session {}", upload.kind.noun(), session);

    let task = tokio::spawn(async move {
        let assistant = state.assistant(FeatureKind::Media)?;
        assistant.analyze_media(&surface, &upload).await
    });

    let delivery = task.await.map_err(|e| {
        error!("Media analysis task failed: {}", e);
        AssistError::Internal("Media analysis task failed".to_string())
    })??;

    Ok(Json(delivery.into()))
}

#[derive(Debug, Deserialize)]
pub struct GeocodeRequest {
    pub address: String,
}

/// POST /api/places/geocode
pub async fn geocode_handler(
    State(state): State<AppState>,
    Json(body): Json<GeocodeRequest>,
) -> Result<Json<Location>> {
    let address = body.address.trim();
    if address.is_empty() {
        return Err(AssistError::InvalidInput("Please enter an address.".to_string()));
    }

    let location = state.places.resolve_address(address).await?;
    Ok(Json(location))
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub kind: ServiceKind,
}

/// GET /api/places/nearby?latitude=..&longitude=..&kind=vet
pub async fn nearby_handler(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<PetService>>> {
    check_coordinates(query.latitude, query.longitude)?;

    let services = state
        .places
        .find_nearby(query.latitude, query.longitude, query.kind)
        .await?;
    Ok(Json(services))
}
