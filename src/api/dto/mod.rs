//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization with camelCase
//! keys, and validator for input validation.

pub mod analytics;
pub mod health;
pub mod links;
pub mod pagination;
pub mod shorten;
pub mod update_link;

use serde::Serialize;

/// Success envelope: `{ "success": true, "data": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Success envelope without payload: `{ "success": true, "message": ... }`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
