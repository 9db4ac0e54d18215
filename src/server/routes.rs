// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    analyze_media_handler, close_surface_handler, geocode_handler, health_handler,
    metrics_handler, nearby_handler, submit_message_handler, surface_handler,
};
use super::middleware::{cors_layer, record_metrics, request_id_layers};
use crate::cache::{Clock, ResponseMemoizer, SystemClock};
use crate::config::AppConfig;
use crate::error::{AssistError, Result};
use crate::features::{FeatureAssistant, FeatureKind, FeatureProfile};
use crate::gemini::AiProvider;
use crate::places::PlacesProvider;
use crate::surface::SurfaceRegistry;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

/// Shared application state; the composition root of the service.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub memoizer: Arc<ResponseMemoizer>,
    pub assistants: Arc<HashMap<FeatureKind, FeatureAssistant>>,
    pub surfaces: Arc<SurfaceRegistry>,
    pub places: Arc<dyn PlacesProvider>,
}

impl AppState {
    /// Wire the memoizer, one assistant per feature, and the surface registry
    pub fn new(
        config: AppConfig,
        provider: Arc<dyn AiProvider>,
        places: Arc<dyn PlacesProvider>,
    ) -> Self {
        Self::with_clock(config, provider, places, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: AppConfig,
        provider: Arc<dyn AiProvider>,
        places: Arc<dyn PlacesProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let memoizer = Arc::new(ResponseMemoizer::with_clock(config.cache.ttl(), clock));
        let deadline = Duration::from_secs(config.gemini.request_deadline_seconds);

        let assistants: HashMap<FeatureKind, FeatureAssistant> = FeatureKind::ALL
            .into_iter()
            .map(|kind| {
                let assistant = FeatureAssistant::new(
                    FeatureProfile::for_kind(kind, &config.gemini),
                    Arc::clone(&provider),
                    Arc::clone(&memoizer),
                )
                .with_deadline(deadline)
                .with_media_keys(config.cache.media_strategy());
                (kind, assistant)
            })
            .collect();

        Self {
            config: Arc::new(config),
            memoizer,
            assistants: Arc::new(assistants),
            surfaces: Arc::new(SurfaceRegistry::new()),
            places,
        }
    }

    pub fn assistant(&self, kind: FeatureKind) -> Result<&FeatureAssistant> {
        self.assistants
            .get(&kind)
            .ok_or_else(|| AssistError::Internal(format!("No assistant for {}", kind)))
    }
}

pub fn create_router(state: AppState) -> Result<Router> {
    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(
            "/api/surfaces/:feature/:session",
            get(surface_handler).delete(close_surface_handler),
        )
        .route(
            "/api/surfaces/:feature/:session/messages",
            post(submit_message_handler),
        )
        .route("/api/media/:session/analyze", post(analyze_media_handler))
        .route("/api/places/geocode", post(geocode_handler))
        .route("/api/places/nearby", get(nearby_handler))
        .route_layer(middleware::from_fn(record_metrics))
        // Base64 media: a 30MB upload is ~40MB encoded
        .layer(tower_http::limit::RequestBodyLimitLayer::new(50 * 1024 * 1024))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
