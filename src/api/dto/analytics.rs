//! DTOs for analytics endpoints.

use serde::Serialize;

use crate::api::dto::links::LinkSummary;
use crate::api::dto::shorten::LinkView;
use crate::domain::analytics::LinkAnalytics;

/// Per-link analytics: the link itself plus its aggregated click data.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub url: LinkView,
    pub analytics: LinkAnalytics,
}

/// Site-wide overview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub total_urls: u64,
    pub total_clicks: u64,
    pub recent_urls: Vec<LinkSummary>,
}
