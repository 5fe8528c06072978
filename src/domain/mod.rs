//! Domain layer containing business entities and logic.
//!
//! Independent of infrastructure and presentation concerns.
//!
//! - [`entities`] - Link records and click events
//! - [`repositories`] - The [`repositories::LinkStore`] contract
//! - [`analytics`] - Pure aggregation of click history
//!
//! # Click Recording Flow
//!
//! 1. HTTP handler captures request metadata as [`entities::ClickMeta`]
//! 2. [`crate::application::services::RedirectService`] stamps it with the current time
//! 3. [`repositories::LinkStore::append_click`] checks availability and appends atomically
//! 4. The handler issues the redirect only after the append has committed

pub mod analytics;
pub mod entities;
pub mod repositories;
