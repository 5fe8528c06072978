//! DTOs for link retrieval endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{ClickEvent, LinkRecord};

/// Full link record including click history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDetail {
    pub code: String,
    pub destination_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub alias: Option<String>,
    pub description: String,
    pub click_count: u64,
    pub click_history: Vec<ClickEvent>,
}

impl LinkDetail {
    pub fn from_record(record: LinkRecord, short_url: String) -> Self {
        Self {
            code: record.code,
            destination_url: record.destination_url,
            short_url,
            created_at: record.created_at,
            expires_at: record.expires_at,
            active: record.active,
            alias: record.alias,
            description: record.description,
            click_count: record.click_count,
            click_history: record.click_history,
        }
    }
}

/// Compact link entry used in the site-wide overview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSummary {
    pub code: String,
    pub destination_url: String,
    pub short_url: String,
    pub click_count: u64,
    pub created_at: DateTime<Utc>,
}

impl LinkSummary {
    pub fn from_record(record: &LinkRecord, short_url: String) -> Self {
        Self {
            code: record.code.clone(),
            destination_url: record.destination_url.clone(),
            short_url,
            click_count: record.click_count,
            created_at: record.created_at,
        }
    }
}
