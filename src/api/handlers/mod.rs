//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod analytics;
pub mod health;
pub mod links;
pub mod redirect;

pub use analytics::{link_analytics_handler, overview_handler};
pub use health::health_handler;
pub use links::{
    delete_link_handler, get_link_handler, list_links_handler, shorten_handler,
    update_link_handler,
};
pub use redirect::redirect_handler;
