//! DTO for the link update endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::LinkPatch;

/// Request body for `PATCH /api/urls/{code}`.
///
/// All fields are optional; only provided fields are changed. The
/// destination URL and the code itself are immutable.
///
/// # `expiresAt` semantics
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear expiry (link never expires)
/// - **Timestamp** → set new expiry
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    pub active: Option<bool>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateLinkRequest> for LinkPatch {
    fn from(req: UpdateLinkRequest) -> Self {
        LinkPatch {
            description: req.description,
            active: req.active,
            expires_at: req.expires_at,
        }
    }
}
