//! API route configuration.

use crate::api::handlers::{
    delete_link_handler, get_link_handler, link_analytics_handler, list_links_handler,
    overview_handler, shorten_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// JSON API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /urls/shorten`     - Create a short link
/// - `GET    /urls`             - List links, newest first
/// - `GET    /urls/{code}`      - Link details with click history
/// - `PATCH  /urls/{code}`      - Update description, active flag, expiry
/// - `DELETE /urls/{code}`      - Delete a link and its history
/// - `GET    /analytics`        - Site-wide overview
/// - `GET    /analytics/{code}` - Per-link analytics
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/urls/shorten", post(shorten_handler))
        .route("/urls", get(list_links_handler))
        .route(
            "/urls/{code}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/analytics", get(overview_handler))
        .route("/analytics/{code}", get(link_analytics_handler))
}
