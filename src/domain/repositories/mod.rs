//! Storage trait definitions for the domain layer.
//!
//! The [`LinkStore`] trait is the single seam between the core logic and
//! persistence. Implementations live in `crate::infrastructure::persistence`;
//! mock implementations are generated via `mockall` for unit tests.

pub mod link_store;

pub use link_store::LinkStore;

#[cfg(test)]
pub use link_store::MockLinkStore;
