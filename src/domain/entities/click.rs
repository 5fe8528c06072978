//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A click recorded when a short link is resolved.
///
/// The timestamp is always set by the resolver. The request metadata is
/// best-effort and untrusted: absent headers stay `None` and are never
/// replaced by placeholder values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub timestamp: DateTime<Utc>,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl ClickEvent {
    /// Creates a click event stamped with `timestamp`.
    ///
    /// Empty or whitespace-only header values are stored as absent. Anything
    /// else is kept exactly as sent.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     Utc::now(),
    ///     Some("192.168.1.1".to_string()),
    ///     Some("Mozilla/5.0"),
    ///     Some("https://google.com"),
    /// );
    /// ```
    pub fn new(
        timestamp: DateTime<Utc>,
        source_ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            timestamp,
            source_ip: source_ip.filter(|ip| !ip.is_empty()),
            user_agent: non_empty(user_agent),
            referer: non_empty(referer),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// Request metadata captured by the redirect handler.
///
/// Turned into a [`ClickEvent`] by the resolver, which owns the timestamp.
#[derive(Debug, Clone, Default)]
pub struct ClickMeta {
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl ClickMeta {
    /// Stamps the metadata with the time of the redirect.
    pub fn into_event(self, timestamp: DateTime<Utc>) -> ClickEvent {
        ClickEvent::new(
            timestamp,
            self.source_ip,
            self.user_agent.as_deref(),
            self.referer.as_deref(),
        )
    }
}

/// Outcome of a committed click append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickReceipt {
    pub destination_url: String,
    pub click_count: u64,
}
