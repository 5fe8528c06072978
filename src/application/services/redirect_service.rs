//! Redirect resolution with click accounting.

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::entities::ClickMeta;
use crate::domain::repositories::LinkStore;
use crate::error::AppError;

/// Resolves short codes to destinations and records one click per success.
///
/// Lookup, activity check and click append run as a single
/// [`LinkStore::append_click`] call, so the check and the write observe the
/// same snapshot. The destination is returned only after the click has been
/// committed.
pub struct RedirectService<S: LinkStore + ?Sized> {
    store: Arc<S>,
}

impl<S: LinkStore + ?Sized> RedirectService<S> {
    /// Creates a new redirect service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolves `code` and records the visit.
    ///
    /// The store stamps the click; the timestamp never comes from the client.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code does not exist
    /// - [`AppError::Inactive`] if the link was disabled
    /// - [`AppError::Expired`] if the link expired
    /// - [`AppError::StoreUnavailable`] / [`AppError::Internal`] on storage failures
    pub async fn resolve(&self, code: &str, meta: ClickMeta) -> Result<String, AppError> {
        match self.store.append_click(code, meta).await {
            Ok(receipt) => {
                metrics::counter!("redirects_total", "outcome" => "redirected").increment(1);
                debug!(code, clicks = receipt.click_count, "Click recorded");
                Ok(receipt.destination_url)
            }
            Err(e) => {
                let outcome = match &e {
                    AppError::NotFound => "not_found",
                    AppError::Inactive => "inactive",
                    AppError::Expired => "expired",
                    _ => "error",
                };
                metrics::counter!("redirects_total", "outcome" => outcome).increment(1);

                if outcome == "error" {
                    error!(code, error = %e, "Failed to record click");
                } else {
                    debug!(code, outcome, "Redirect rejected");
                }
                Err(e)
            }
        }
    }
}
