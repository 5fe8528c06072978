//! Short code generation and alias validation.
//!
//! Generated codes are random and unpredictable; aliases are caller-chosen
//! codes that share the same uniqueness domain.

use crate::error::AppError;
use base64::Engine as _;

/// Random bytes per generated code. 6 bytes encode to 8 base64 characters.
const CODE_LENGTH_BYTES: usize = 6;

/// Length of a generated code.
pub const GENERATED_CODE_LEN: usize = 8;

const ALIAS_MIN_LEN: usize = 3;
const ALIAS_MAX_LEN: usize = 50;

/// Codes that would shadow top-level routes.
const RESERVED_CODES: &[&str] = &["api", "health"];

/// Returns the alias verbatim when present and non-empty, otherwise a fresh
/// random code.
///
/// Uniqueness is checked downstream by the registry.
pub fn generate(alias: Option<&str>) -> String {
    match alias {
        Some(alias) if !alias.is_empty() => alias.to_string(),
        _ => generate_code(),
    }
}

/// Generates a cryptographically secure random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing an 8-character code (48 bits).
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Validates a caller-supplied alias.
///
/// # Rules
///
/// - Length: 3-50 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::InvalidAlias`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    if !(ALIAS_MIN_LEN..=ALIAS_MAX_LEN).contains(&alias.len()) {
        return Err(AppError::InvalidAlias(format!(
            "alias must be {}-{} characters",
            ALIAS_MIN_LEN, ALIAS_MAX_LEN
        )));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::InvalidAlias(
            "alias can only contain letters, digits, hyphens and underscores".to_string(),
        ));
    }

    if RESERVED_CODES.contains(&alias.to_ascii_lowercase().as_str()) {
        return Err(AppError::InvalidAlias(format!("'{}' is reserved", alias)));
    }

    Ok(())
}
