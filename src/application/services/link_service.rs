//! Link registry: creation, lookup, listing, update and deletion.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::entities::{LinkPatch, LinkRecord, NewLink};
use crate::domain::repositories::LinkStore;
use crate::error::AppError;
use crate::utils::code_generator::{generate, validate_alias};
use crate::utils::url_validator::validate_destination;

/// Upper bound on a single listing page.
pub const MAX_PAGE_SIZE: usize = 50;

/// Attempts at drawing an unused random code before giving up.
const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Service for creating and managing shortened links.
///
/// Validates destinations and aliases, and guarantees that every created code
/// is unique among live records.
pub struct LinkService<S: LinkStore + ?Sized> {
    store: Arc<S>,
    base_url: String,
}

impl<S: LinkStore + ?Sized> LinkService<S> {
    /// Creates a new link service.
    ///
    /// `base_url` prefixes every short URL (`{base_url}/{code}`).
    pub fn new(store: Arc<S>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into(),
        }
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `destination_url` - The original URL (absolute, HTTP or HTTPS)
    /// - `alias` - Optional caller-chosen code; empty is treated as absent
    /// - `description` - Optional free text
    /// - `expires_at` - Optional expiry; the link stays listable afterwards
    ///
    /// # Code Generation
    ///
    /// Without an alias, random 8-character codes are drawn until one is
    /// accepted by the store, at most 10 times.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the destination is not a valid absolute URL
    /// - [`AppError::InvalidAlias`] if the alias violates the format rules
    /// - [`AppError::AliasTaken`] if the alias is already in use
    /// - [`AppError::GenerationExhausted`] if every generated code collided
    pub async fn create_short_link(
        &self,
        destination_url: String,
        alias: Option<String>,
        description: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<LinkRecord, AppError> {
        let destination_url = validate_destination(&destination_url)
            .map_err(|e| AppError::InvalidUrl(e.to_string()))?;

        let description = description.unwrap_or_default();
        let alias = alias.filter(|a| !a.is_empty());

        let record = if let Some(alias) = alias {
            validate_alias(&alias)?;

            if self.store.find_by_code(&alias).await?.is_some() {
                return Err(AppError::AliasTaken(alias));
            }

            let new_link = NewLink {
                code: generate(Some(&alias)),
                destination_url,
                alias: Some(alias),
                description,
                expires_at,
            };
            self.store
                .insert(LinkRecord::from_new(new_link, Utc::now()))
                .await?
        } else {
            self.insert_with_generated_code(destination_url, description, expires_at)
                .await?
        };

        metrics::counter!("links_created_total").increment(1);
        info!(code = %record.code, destination = %record.destination_url, "Short link created");

        Ok(record)
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn get_link(&self, code: &str) -> Result<LinkRecord, AppError> {
        self.store
            .find_by_code(code)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Lists links, most recently created first.
    ///
    /// `limit` defaults to and is clamped at [`MAX_PAGE_SIZE`].
    pub async fn list_links(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<LinkRecord>, AppError> {
        let limit = limit.unwrap_or(MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        self.store.list(limit, offset.unwrap_or(0)).await
    }

    /// Applies an administrative update to a link.
    ///
    /// Only description, active flag and expiry can change.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn update_link(&self, code: &str, patch: LinkPatch) -> Result<LinkRecord, AppError> {
        let record = self
            .store
            .update(code, patch)
            .await?
            .ok_or(AppError::NotFound)?;

        info!(code, active = record.active, "Short link updated");
        Ok(record)
    }

    /// Irreversibly deletes a link and its click history.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn delete_link(&self, code: &str) -> Result<(), AppError> {
        if !self.store.delete(code).await? {
            return Err(AppError::NotFound);
        }

        metrics::counter!("links_deleted_total").increment(1);
        info!(code, "Short link deleted");
        Ok(())
    }

    /// Constructs the full short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }

    async fn insert_with_generated_code(
        &self,
        destination_url: String,
        description: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<LinkRecord, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let new_link = NewLink {
                code: generate(None),
                destination_url: destination_url.clone(),
                alias: None,
                description: description.clone(),
                expires_at,
            };

            match self
                .store
                .insert(LinkRecord::from_new(new_link, Utc::now()))
                .await
            {
                Ok(record) => return Ok(record),
                Err(AppError::AliasTaken(code)) => {
                    debug!(code, attempt, "Generated code collided, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::GenerationExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkStore;
    use crate::utils::code_generator::GENERATED_CODE_LEN;
    use mockall::predicate::eq;

    fn stored(code: &str) -> LinkRecord {
        LinkRecord::from_new(
            NewLink {
                code: code.to_string(),
                destination_url: "https://example.com".to_string(),
                alias: None,
                description: String::new(),
                expires_at: None,
            },
            Utc::now(),
        )
    }

    fn service(store: MockLinkStore) -> LinkService<MockLinkStore> {
        LinkService::new(Arc::new(store), "http://localhost:5000/")
    }

    #[tokio::test]
    async fn test_create_short_link_generated_code() {
        let mut store = MockLinkStore::new();
        store.expect_find_by_code().times(0);
        store
            .expect_insert()
            .withf(|record| {
                record.code.len() == GENERATED_CODE_LEN
                    && record.alias.is_none()
                    && record.click_count == 0
                    && record.click_history.is_empty()
                    && record.active
            })
            .times(1)
            .returning(Ok);

        let link = service(store)
            .create_short_link("https://example.com/page".to_string(), None, None, None)
            .await
            .unwrap();

        assert_eq!(link.destination_url, "https://example.com/page");
        assert_eq!(link.description, "");
        assert!(link.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_create_short_link_with_alias() {
        let mut store = MockLinkStore::new();
        store
            .expect_find_by_code()
            .withf(|code| code == "promo")
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_insert()
            .withf(|record| record.code == "promo" && record.alias.as_deref() == Some("promo"))
            .times(1)
            .returning(Ok);

        let link = service(store)
            .create_short_link(
                "https://example.com/page".to_string(),
                Some("promo".to_string()),
                Some("Spring sale".to_string()),
                None,
            )
            .await
            .unwrap();

        assert_eq!(link.code, "promo");
        assert_eq!(link.description, "Spring sale");
    }

    #[tokio::test]
    async fn test_create_short_link_alias_taken() {
        let mut store = MockLinkStore::new();
        store
            .expect_find_by_code()
            .returning(|code| Ok(Some(stored(code))));
        store.expect_insert().times(0);

        let result = service(store)
            .create_short_link(
                "https://example.com".to_string(),
                Some("promo".to_string()),
                None,
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::AliasTaken(code)) if code == "promo"));
    }

    #[tokio::test]
    async fn test_create_short_link_alias_race_reported_as_taken() {
        let mut store = MockLinkStore::new();
        store.expect_find_by_code().returning(|_| Ok(None));
        store
            .expect_insert()
            .times(1)
            .returning(|record| Err(AppError::AliasTaken(record.code)));

        let result = service(store)
            .create_short_link(
                "https://example.com".to_string(),
                Some("promo".to_string()),
                None,
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::AliasTaken(_))));
    }

    #[tokio::test]
    async fn test_create_short_link_empty_alias_generates_code() {
        let mut store = MockLinkStore::new();
        store.expect_find_by_code().times(0);
        store
            .expect_insert()
            .withf(|record| record.code.len() == GENERATED_CODE_LEN && record.alias.is_none())
            .times(1)
            .returning(Ok);

        let result = service(store)
            .create_short_link(
                "https://example.com".to_string(),
                Some(String::new()),
                None,
                None,
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_short_link_invalid_url() {
        let store = MockLinkStore::new();

        let result = service(store)
            .create_short_link("not-a-url".to_string(), None, None, None)
            .await;

        assert!(matches!(result, Err(AppError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_create_short_link_invalid_alias() {
        let store = MockLinkStore::new();

        let result = service(store)
            .create_short_link(
                "https://example.com".to_string(),
                Some("has space".to_string()),
                None,
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidAlias(_))));
    }

    #[tokio::test]
    async fn test_create_retries_on_collision() {
        let mut store = MockLinkStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_insert()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|record| Err(AppError::AliasTaken(record.code)));
        store
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(Ok);

        let result = service(store)
            .create_short_link("https://example.com".to_string(), None, None, None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_generation_exhausted() {
        let mut store = MockLinkStore::new();
        store
            .expect_insert()
            .times(MAX_GENERATION_ATTEMPTS)
            .returning(|record| Err(AppError::AliasTaken(record.code)));

        let result = service(store)
            .create_short_link("https://example.com".to_string(), None, None, None)
            .await;

        assert!(matches!(result, Err(AppError::GenerationExhausted)));
    }

    #[tokio::test]
    async fn test_create_propagates_store_unavailable() {
        let mut store = MockLinkStore::new();
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(AppError::StoreUnavailable("pool timed out".to_string())));

        let result = service(store)
            .create_short_link("https://example.com".to_string(), None, None, None)
            .await;

        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_get_link_not_found() {
        let mut store = MockLinkStore::new();
        store.expect_find_by_code().returning(|_| Ok(None));

        let result = service(store).get_link("missing").await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_links_clamps_limit() {
        let mut store = MockLinkStore::new();
        store
            .expect_list()
            .with(eq(MAX_PAGE_SIZE), eq(0usize))
            .times(2)
            .returning(|_, _| Ok(vec![]));
        store
            .expect_list()
            .with(eq(1usize), eq(20usize))
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let service = service(store);
        service.list_links(None, None).await.unwrap();
        service.list_links(Some(500), None).await.unwrap();
        service.list_links(Some(0), Some(20)).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_link_not_found() {
        let mut store = MockLinkStore::new();
        store.expect_delete().returning(|_| Ok(false));

        let result = service(store).delete_link("missing").await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_link_not_found() {
        let mut store = MockLinkStore::new();
        store.expect_update().returning(|_, _| Ok(None));

        let result = service(store)
            .update_link("missing", LinkPatch::default())
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let service = service(MockLinkStore::new());
        assert_eq!(service.short_url("abc"), "http://localhost:5000/abc");
    }
}
