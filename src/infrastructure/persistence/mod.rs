//! Link store implementations.
//!
//! - [`MemoryLinkStore`] - Concurrent in-process map, used when no database is available
//! - [`PgLinkStore`] - PostgreSQL tables `links` and `link_clicks`

pub mod memory_store;
pub mod pg_link_store;

pub use memory_store::MemoryLinkStore;
pub use pg_link_store::{PgLinkStore, PoolSettings};
