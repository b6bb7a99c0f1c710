//! Router configuration for the helpdesk.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::{health_check, metrics_handler, readiness_check};
use super::state::AppState;
use crate::api::{classify, stats, tickets};
use axum::{
    Router,
    http::{HeaderName, HeaderValue},
    routing::{get, post},
};
use helpdesk_web::correlation_id_layer;
use tower::Layer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Build the Axum router.
///
/// - `/health`, `/ready`, `/metrics`
/// - ticket, stats and classification endpoints under `/api`
///
/// The static `/tickets/stats` and `/tickets/classify` routes take precedence
/// over `/tickets/:id`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/tickets",
            get(tickets::list_tickets).post(tickets::create_ticket),
        )
        .route("/tickets/stats", get(stats::get_stats))
        .route("/tickets/classify", post(classify::classify_ticket))
        .route(
            "/tickets/:id",
            get(tickets::get_ticket)
                .patch(tickets::update_ticket)
                .put(tickets::update_ticket),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .nest("/api", api_routes)
        .with_state(state)
}

/// Build the served application: router, correlation IDs, CORS, and
/// trailing-slash normalization.
///
/// An empty `cors_origins` list allows any origin.
pub fn build_app(state: AppState, cors_origins: &[String]) -> NormalizePath<Router> {
    let router = build_router(state)
        .layer(correlation_id_layer())
        .layer(cors_layer(cors_origins));

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static("x-correlation-id")]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    tracing::debug!(?origins, "CORS restricted to configured origins");
    layer.allow_origin(AllowOrigin::list(allowed))
}
