//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`  - Short link redirect
//! - `GET  /health`  - Health check with store probe
//! - `/api/*`        - JSON API (rate limited per client IP)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Permissive, the dashboard is served from another origin
//! - **Rate limiting** - Per-IP token bucket on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routed application without path normalization.
///
/// When `state.behind_proxy` is set, the rate limiter keys on the forwarded
/// client address instead of the socket peer.
pub fn router(state: AppState) -> Router {
    let api_router = if state.behind_proxy {
        api::routes::api_routes().layer(rate_limit::proxied_layer())
    } else {
        api::routes::api_routes().layer(rate_limit::layer())
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(tracing::layer())
}

/// Constructs the application with all routes and middleware.
///
/// Trailing slashes are trimmed before routing, so `/api/urls/` and
/// `/api/urls` are the same route.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
