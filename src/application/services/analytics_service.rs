//! Per-link analytics and the site-wide overview.

use std::sync::Arc;

use crate::domain::analytics::{LinkAnalytics, aggregate};
use crate::domain::entities::LinkRecord;
use crate::domain::repositories::LinkStore;
use crate::error::AppError;

/// Number of links listed in [`Overview::recent_links`].
pub const OVERVIEW_RECENT_LINKS: usize = 5;

/// A link together with the analytics derived from its history.
#[derive(Debug, Clone)]
pub struct LinkReport {
    pub link: LinkRecord,
    pub analytics: LinkAnalytics,
}

/// Site-wide totals.
#[derive(Debug, Clone)]
pub struct Overview {
    pub total_links: u64,
    pub total_clicks: u64,
    pub recent_links: Vec<LinkRecord>,
}

/// Read-side service; computes everything on demand and keeps no state.
pub struct AnalyticsService<S: LinkStore + ?Sized> {
    store: Arc<S>,
}

impl<S: LinkStore + ?Sized> AnalyticsService<S> {
    /// Creates a new analytics service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Builds the analytics report for one link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn link_report(&self, code: &str) -> Result<LinkReport, AppError> {
        let link = self
            .store
            .find_by_code(code)
            .await?
            .ok_or(AppError::NotFound)?;

        let analytics = aggregate(&link);

        Ok(LinkReport { link, analytics })
    }

    /// Counts links and clicks and lists the most recently created links.
    pub async fn overview(&self) -> Result<Overview, AppError> {
        let total_links = self.store.count().await?;
        let total_clicks = self.store.total_clicks().await?;
        let recent_links = self.store.list(OVERVIEW_RECENT_LINKS, 0).await?;

        Ok(Overview {
            total_links,
            total_clicks,
            recent_links,
        })
    }
}
