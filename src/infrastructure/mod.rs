//! Infrastructure layer for external integrations.
//!
//! Implements the domain's [`LinkStore`](crate::domain::repositories::LinkStore)
//! contract over concrete storage.
//!
//! # Modules
//!
//! - [`persistence`] - In-memory and PostgreSQL link stores

pub mod persistence;
