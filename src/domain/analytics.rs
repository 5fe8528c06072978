//! On-demand click analytics.
//!
//! [`aggregate`] folds a link's click history into time-bucketed and
//! categorical summaries. It holds no state: identical input always yields
//! identical output. All buckets use UTC.

use std::collections::BTreeMap;

use chrono::Timelike;
use serde::Serialize;

use crate::domain::entities::{ClickEvent, LinkRecord};

/// Number of events returned in [`LinkAnalytics::recent_clicks`].
pub const RECENT_CLICKS_LIMIT: usize = 10;

/// Referrer bucket for clicks without a `Referer` header.
pub const DIRECT_REFERRER: &str = "Direct";

/// Browser family derived from a raw user-agent string.
///
/// Classification is a substring match in fixed priority order, not a real
/// user-agent parse: an agent mentioning both "Chrome" and "Safari" is Chrome.
/// A missing user agent lands in [`BrowserCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum BrowserCategory {
    Chrome,
    Firefox,
    Safari,
    Other,
}

impl BrowserCategory {
    pub fn classify(user_agent: Option<&str>) -> Self {
        let Some(ua) = user_agent else {
            return Self::Other;
        };

        if ua.contains("Chrome") {
            Self::Chrome
        } else if ua.contains("Firefox") {
            Self::Firefox
        } else if ua.contains("Safari") {
            Self::Safari
        } else {
            Self::Other
        }
    }
}

/// Per-link analytics summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnalytics {
    pub total_clicks: u64,
    /// `YYYY-MM-DD` → clicks; only dates with at least one click.
    pub clicks_by_date: BTreeMap<String, u64>,
    /// Index = hour of day, summed across all dates.
    pub clicks_by_hour: [u64; 24],
    pub referrers: BTreeMap<String, u64>,
    pub user_agent_categories: BTreeMap<BrowserCategory, u64>,
    /// Most recent first.
    pub recent_clicks: Vec<ClickEvent>,
}

/// Folds the record's click history into a [`LinkAnalytics`] summary.
pub fn aggregate(record: &LinkRecord) -> LinkAnalytics {
    let mut clicks_by_date = BTreeMap::new();
    let mut clicks_by_hour = [0u64; 24];
    let mut referrers = BTreeMap::new();
    let mut user_agent_categories = BTreeMap::new();

    for click in &record.click_history {
        let date = click.timestamp.date_naive().format("%Y-%m-%d").to_string();
        *clicks_by_date.entry(date).or_insert(0) += 1;

        clicks_by_hour[click.timestamp.hour() as usize] += 1;

        let referer = click
            .referer
            .clone()
            .unwrap_or_else(|| DIRECT_REFERRER.to_string());
        *referrers.entry(referer).or_insert(0) += 1;

        let browser = BrowserCategory::classify(click.user_agent.as_deref());
        *user_agent_categories.entry(browser).or_insert(0) += 1;
    }

    let recent_clicks = record
        .click_history
        .iter()
        .rev()
        .take(RECENT_CLICKS_LIMIT)
        .cloned()
        .collect();

    LinkAnalytics {
        total_clicks: record.click_count,
        clicks_by_date,
        clicks_by_hour,
        referrers,
        user_agent_categories,
        recent_clicks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewLink;
    use chrono::{DateTime, TimeZone, Utc};

    const CHROME_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
    const FIREFOX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
    const SAFARI_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_2) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15";

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 15, 0).unwrap()
    }

    fn record_with(clicks: Vec<ClickEvent>) -> LinkRecord {
        let mut record = LinkRecord::from_new(
            NewLink {
                code: "promo".to_string(),
                destination_url: "https://example.com/page".to_string(),
                alias: Some("promo".to_string()),
                description: String::new(),
                expires_at: None,
            },
            at(2024, 1, 1, 0),
        );
        for click in clicks {
            record.record_click(click).unwrap();
        }
        record
    }

    #[test]
    fn test_classify_priority_order() {
        assert_eq!(
            BrowserCategory::classify(Some(CHROME_UA)),
            BrowserCategory::Chrome
        );
        assert_eq!(
            BrowserCategory::classify(Some(FIREFOX_UA)),
            BrowserCategory::Firefox
        );
        assert_eq!(
            BrowserCategory::classify(Some(SAFARI_UA)),
            BrowserCategory::Safari
        );
        assert_eq!(
            BrowserCategory::classify(Some("curl/8.4.0")),
            BrowserCategory::Other
        );
        assert_eq!(BrowserCategory::classify(None), BrowserCategory::Other);
    }

    #[test]
    fn test_classification_is_case_sensitive() {
        assert_eq!(
            BrowserCategory::classify(Some("chrome-lowercase-bot")),
            BrowserCategory::Other
        );
    }

    #[test]
    fn test_empty_history() {
        let analytics = aggregate(&record_with(vec![]));

        assert_eq!(analytics.total_clicks, 0);
        assert!(analytics.clicks_by_date.is_empty());
        assert_eq!(analytics.clicks_by_hour, [0; 24]);
        assert!(analytics.referrers.is_empty());
        assert!(analytics.user_agent_categories.is_empty());
        assert!(analytics.recent_clicks.is_empty());
    }

    #[test]
    fn test_buckets_by_utc_date_and_hour() {
        let analytics = aggregate(&record_with(vec![
            ClickEvent::new(at(2024, 3, 1, 9), None, None, None),
            ClickEvent::new(at(2024, 3, 1, 23), None, None, None),
            ClickEvent::new(at(2024, 3, 2, 9), None, None, None),
        ]));

        assert_eq!(analytics.clicks_by_date.len(), 2);
        assert_eq!(analytics.clicks_by_date["2024-03-01"], 2);
        assert_eq!(analytics.clicks_by_date["2024-03-02"], 1);
        assert_eq!(analytics.clicks_by_hour[9], 2);
        assert_eq!(analytics.clicks_by_hour[23], 1);
    }

    #[test]
    fn test_bucket_sums_match_total() {
        let clicks = (0..37)
            .map(|i| ClickEvent::new(at(2024, 5, 1 + (i % 7), i % 24), None, None, None))
            .collect();
        let analytics = aggregate(&record_with(clicks));

        assert_eq!(analytics.total_clicks, 37);
        assert_eq!(analytics.clicks_by_hour.iter().sum::<u64>(), 37);
        assert_eq!(analytics.clicks_by_date.values().sum::<u64>(), 37);
        assert_eq!(analytics.referrers.values().sum::<u64>(), 37);
        assert_eq!(analytics.user_agent_categories.values().sum::<u64>(), 37);
    }

    #[test]
    fn test_referrers_default_to_direct() {
        let analytics = aggregate(&record_with(vec![
            ClickEvent::new(at(2024, 1, 2, 1), None, None, Some("https://news.ycombinator.com")),
            ClickEvent::new(at(2024, 1, 2, 2), None, None, None),
            ClickEvent::new(at(2024, 1, 2, 3), None, None, None),
        ]));

        assert_eq!(analytics.referrers[DIRECT_REFERRER], 2);
        assert_eq!(analytics.referrers["https://news.ycombinator.com"], 1);
    }

    #[test]
    fn test_user_agent_categories_merge_unknown_into_other() {
        let analytics = aggregate(&record_with(vec![
            ClickEvent::new(at(2024, 1, 2, 1), None, Some(CHROME_UA), None),
            ClickEvent::new(at(2024, 1, 2, 2), None, Some(FIREFOX_UA), None),
            ClickEvent::new(at(2024, 1, 2, 3), None, None, None),
        ]));

        assert_eq!(analytics.user_agent_categories.len(), 3);
        assert_eq!(analytics.user_agent_categories[&BrowserCategory::Chrome], 1);
        assert_eq!(analytics.user_agent_categories[&BrowserCategory::Firefox], 1);
        assert_eq!(analytics.user_agent_categories[&BrowserCategory::Other], 1);

        let json = serde_json::to_value(&analytics).unwrap();
        assert_eq!(json["userAgentCategories"]["Other"], 1);
        assert!(json["userAgentCategories"].get("Safari").is_none());
    }

    #[test]
    fn test_recent_clicks_are_last_ten_reversed() {
        let clicks = (0..15)
            .map(|i| ClickEvent::new(at(2024, 2, 1, i), None, None, None))
            .collect();
        let analytics = aggregate(&record_with(clicks));

        assert_eq!(analytics.recent_clicks.len(), RECENT_CLICKS_LIMIT);
        assert_eq!(analytics.recent_clicks[0].timestamp, at(2024, 2, 1, 14));
        assert_eq!(analytics.recent_clicks[9].timestamp, at(2024, 2, 1, 5));
    }

    #[test]
    fn test_aggregate_is_pure() {
        let record = record_with(vec![
            ClickEvent::new(at(2024, 1, 2, 1), Some("1.2.3.4".into()), Some(SAFARI_UA), None),
            ClickEvent::new(at(2024, 1, 3, 4), None, None, Some("https://t.co")),
        ]);

        let first = serde_json::to_string(&aggregate(&record)).unwrap();
        let second = serde_json::to_string(&aggregate(&record)).unwrap();

        assert_eq!(first, second);
    }
}
