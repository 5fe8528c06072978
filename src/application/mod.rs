//! Application layer services implementing business logic.
//!
//! Services depend only on the [`crate::domain::repositories::LinkStore`]
//! trait and never on a concrete backend.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link registry (create, get, list, update, delete)
//! - [`services::redirect_service::RedirectService`] - Redirect resolution and click recording
//! - [`services::analytics_service::AnalyticsService`] - Per-link analytics and site overview

pub mod services;
