//! DTOs for the link creation endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::LinkRecord;

/// Request body for `POST /api/urls/shorten`.
///
/// `originalUrl` and `customAlias` are accepted as aliases of
/// `destinationUrl` and `alias`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The URL to shorten (absolute, HTTP or HTTPS). A missing value fails
    /// the URL check like an empty one.
    #[serde(default, alias = "originalUrl")]
    #[validate(url(message = "Please provide a valid URL"))]
    pub destination_url: String,

    /// Optional caller-chosen short code.
    #[serde(default, alias = "customAlias")]
    #[validate(length(max = 50, message = "Alias must be at most 50 characters"))]
    pub alias: Option<String>,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// Optional expiry (RFC 3339). After this time redirects return 410 Gone.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Public view of a link, as returned on creation and in analytics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkView {
    pub destination_url: String,
    pub short_url: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub description: String,
}

impl LinkView {
    pub fn from_record(record: &LinkRecord, short_url: String) -> Self {
        Self {
            destination_url: record.destination_url.clone(),
            short_url,
            code: record.code.clone(),
            created_at: record.created_at,
            description: record.description.clone(),
        }
    }
}
