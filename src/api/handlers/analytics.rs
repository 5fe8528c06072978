//! Handlers for analytics endpoints.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::ApiResponse;
use crate::api::dto::analytics::{AnalyticsResponse, OverviewResponse};
use crate::api::dto::links::LinkSummary;
use crate::api::dto::shorten::LinkView;
use crate::error::AppError;
use crate::state::AppState;

/// Returns click analytics for one link.
///
/// # Endpoint
///
/// `GET /api/analytics/{code}`
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "url": { "destinationUrl": "...", "shortUrl": "...", "code": "promo", "createdAt": "...", "description": "" },
///     "analytics": {
///       "totalClicks": 3,
///       "clicksByDate": { "2025-01-01": 3 },
///       "clicksByHour": [0, 0, 3, 0, ...],
///       "referrers": { "Direct": 3 },
///       "userAgentCategories": { "Chrome": 1, "Firefox": 1, "Other": 1 },
///       "recentClicks": [ ... ]
///     }
///   }
/// }
/// ```
///
/// Dates and hours are UTC. Inactive and expired links still report.
pub async fn link_analytics_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AnalyticsResponse>>, AppError> {
    let report = state.analytics_service.link_report(&code).await?;
    let short_url = state.link_service.short_url(&report.link.code);

    Ok(Json(ApiResponse::ok(AnalyticsResponse {
        url: LinkView::from_record(&report.link, short_url),
        analytics: report.analytics,
    })))
}

/// Returns site-wide totals and the five newest links.
///
/// # Endpoint
///
/// `GET /api/analytics`
pub async fn overview_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<OverviewResponse>>, AppError> {
    let overview = state.analytics_service.overview().await?;

    let recent_urls = overview
        .recent_links
        .iter()
        .map(|record| LinkSummary::from_record(record, state.link_service.short_url(&record.code)))
        .collect();

    Ok(Json(ApiResponse::ok(OverviewResponse {
        total_urls: overview.total_links,
        total_clicks: overview.total_clicks,
        recent_urls,
    })))
}
