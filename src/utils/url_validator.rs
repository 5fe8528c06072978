//! Destination URL validation.

use url::Url;

/// Errors that can occur while validating a destination URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must not contain control characters")]
    ControlCharacter,
}

/// Validates that `input` is an absolute HTTP(S) URL with a host.
///
/// Surrounding whitespace is trimmed; the rest of the URL is returned
/// unchanged so redirects go exactly where the creator asked. Embedded
/// control characters are rejected: the parser would silently drop tabs and
/// newlines, and the stored value could never be sent as a `Location` header.
///
/// # Security
///
/// Rejects potentially dangerous protocols like `javascript:`, `data:`, `file:`, etc.
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidFormat`] for malformed or relative URLs.
/// Returns [`UrlValidationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
/// Returns [`UrlValidationError::MissingHost`] if the host is empty.
/// Returns [`UrlValidationError::ControlCharacter`] for embedded control characters.
pub fn validate_destination(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url =
        Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
