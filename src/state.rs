//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AnalyticsService, LinkService, RedirectService};
use crate::domain::repositories::LinkStore;

/// Application state shared across request handlers.
///
/// All services share one [`LinkStore`]; handlers never branch on which
/// backend is active.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkStore>>,
    pub redirect_service: Arc<RedirectService<dyn LinkStore>>,
    pub analytics_service: Arc<AnalyticsService<dyn LinkStore>>,
    pub store: Arc<dyn LinkStore>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for the recorded client address.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires all services over `store`.
    pub fn new(store: Arc<dyn LinkStore>, base_url: impl Into<String>, behind_proxy: bool) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(store.clone(), base_url)),
            redirect_service: Arc::new(RedirectService::new(store.clone())),
            analytics_service: Arc::new(AnalyticsService::new(store.clone())),
            store,
            behind_proxy,
        }
    }
}
