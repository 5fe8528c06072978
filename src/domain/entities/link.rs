//! Link entity representing a shortened URL and its click history.

use chrono::{DateTime, Utc};

use super::click::{ClickEvent, ClickReceipt};
use crate::error::AppError;

/// A shortened URL with its metadata and full click history.
///
/// `click_count` always equals `click_history.len()`. Both are only changed
/// through [`LinkRecord::record_click`], which applies them together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub code: String,
    pub destination_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub alias: Option<String>,
    pub description: String,
    pub click_count: u64,
    pub click_history: Vec<ClickEvent>,
}

impl LinkRecord {
    /// Builds a fresh record from a validated creation request.
    pub fn from_new(new_link: NewLink, created_at: DateTime<Utc>) -> Self {
        Self {
            code: new_link.code,
            destination_url: new_link.destination_url,
            created_at,
            expires_at: new_link.expires_at,
            active: true,
            alias: new_link.alias,
            description: new_link.description,
            click_count: 0,
            click_history: Vec::new(),
        }
    }

    /// Returns true if the link has an expiry strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now > e)
    }

    /// Checks whether the link may be followed at `now`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Inactive`] if the link was disabled
    /// - [`AppError::Expired`] if `expires_at` is in the past
    pub fn ensure_redirectable(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if !self.active {
            return Err(AppError::Inactive);
        }
        if self.is_expired_at(now) {
            return Err(AppError::Expired);
        }
        Ok(())
    }

    /// Checks availability at the event's timestamp, then appends the event
    /// and bumps the counter.
    ///
    /// A rejected record is left untouched.
    pub fn record_click(&mut self, event: ClickEvent) -> Result<ClickReceipt, AppError> {
        self.ensure_redirectable(event.timestamp)?;

        self.click_history.push(event);
        self.click_count += 1;

        Ok(ClickReceipt {
            destination_url: self.destination_url.clone(),
            click_count: self.click_count,
        })
    }

    /// Applies an administrative patch. Code, destination and clicks are immutable.
    pub fn apply_patch(&mut self, patch: LinkPatch) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        if let Some(expires_at) = patch.expires_at {
            self.expires_at = expires_at;
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub destination_url: String,
    pub alias: Option<String>,
    pub description: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub description: Option<String>,
    pub active: Option<bool>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}
