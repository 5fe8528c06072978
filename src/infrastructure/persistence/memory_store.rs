//! In-memory link store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::domain::entities::{ClickMeta, ClickReceipt, LinkPatch, LinkRecord};
use crate::domain::repositories::LinkStore;
use crate::error::AppError;

/// Process-wide link store backed by a concurrent map.
///
/// Used when no database is configured or reachable. Contents live for the
/// lifetime of the process.
///
/// Mutations hold the entry's shard lock for their whole duration and never
/// await while holding it, so a click append is atomic with respect to every
/// other reader and writer of the same code.
pub struct MemoryLinkStore {
    links: DashMap<String, LinkRecord>,
}

impl MemoryLinkStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using in-memory link store");
        Self {
            links: DashMap::new(),
        }
    }
}

impl Default for MemoryLinkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, record: LinkRecord) -> Result<LinkRecord, AppError> {
        match self.links.entry(record.code.clone()) {
            Entry::Occupied(_) => Err(AppError::AliasTaken(record.code)),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LinkRecord>, AppError> {
        Ok(self.links.get(code).map(|entry| entry.value().clone()))
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<LinkRecord>, AppError> {
        let mut records: Vec<LinkRecord> = self
            .links
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });

        Ok(records.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.links.len() as u64)
    }

    async fn total_clicks(&self) -> Result<u64, AppError> {
        Ok(self.links.iter().map(|entry| entry.click_count).sum())
    }

    async fn update(&self, code: &str, patch: LinkPatch) -> Result<Option<LinkRecord>, AppError> {
        Ok(self.links.get_mut(code).map(|mut entry| {
            entry.apply_patch(patch);
            entry.value().clone()
        }))
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.remove(code).is_some())
    }

    async fn append_click(&self, code: &str, meta: ClickMeta) -> Result<ClickReceipt, AppError> {
        let mut entry = self.links.get_mut(code).ok_or(AppError::NotFound)?;
        entry.record_click(meta.into_event(Utc::now()))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
