//! Store trait for link records and their click history.

use crate::domain::entities::{ClickMeta, ClickReceipt, LinkPatch, LinkRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable keyed storage for links, the only shared mutable resource.
///
/// Services depend on this trait alone and never on a concrete backend.
/// Every call may suspend on I/O.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryLinkStore`] - in-process map
/// - [`crate::infrastructure::persistence::PgLinkStore`] - PostgreSQL
/// - Test mocks available with `cfg(test)`
///
/// # Concurrency
///
/// [`LinkStore::append_click`] is the only hot-path mutation. Implementations
/// must serialize it per record so that concurrent clicks on one code are all
/// kept and `click_count` always equals the history length as seen by readers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Short backend identifier used in logs and health reports.
    fn backend_name(&self) -> &'static str;

    /// Persists a new record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasTaken`] if a live record already uses the code.
    /// Returns [`AppError::StoreUnavailable`] on transient storage failures.
    async fn insert(&self, record: LinkRecord) -> Result<LinkRecord, AppError>;

    /// Finds a record, including its click history, by short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(LinkRecord))` if found
    /// - `Ok(None)` if not found
    async fn find_by_code(&self, code: &str) -> Result<Option<LinkRecord>, AppError>;

    /// Lists records ordered by creation time, most recent first.
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<LinkRecord>, AppError>;

    /// Counts all stored records.
    async fn count(&self) -> Result<u64, AppError>;

    /// Sums `click_count` over all stored records.
    async fn total_clicks(&self) -> Result<u64, AppError>;

    /// Applies an administrative patch and returns the updated record.
    ///
    /// Returns `Ok(None)` if no record matches `code`.
    async fn update(&self, code: &str, patch: LinkPatch) -> Result<Option<LinkRecord>, AppError>;

    /// Removes a record and its entire history.
    ///
    /// Returns `Ok(true)` if a record was removed, `Ok(false)` if none matched.
    async fn delete(&self, code: &str) -> Result<bool, AppError>;

    /// Atomically checks availability and records a click.
    ///
    /// The click is stamped while the record is held, so history order is
    /// timestamp order. The activity check at that instant, the history append
    /// and the counter increment are applied as one unit against the
    /// authoritative record. A rejected record is never mutated.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no record matches `code`
    /// - [`AppError::Inactive`] / [`AppError::Expired`] if the link may not be followed
    /// - [`AppError::StoreUnavailable`] on transient storage failures
    async fn append_click(&self, code: &str, meta: ClickMeta) -> Result<ClickReceipt, AppError>;

    /// Checks that the backend can serve requests.
    async fn health_check(&self) -> bool;
}
