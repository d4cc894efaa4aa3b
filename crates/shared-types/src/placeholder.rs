//! # Placeholder Tokens
//!
//! A placeholder is a JSON string value of the exact form `{{binding:<key>}}`.
//! Tokens embedded inside a larger string are not placeholders.

/// Opening part of every placeholder token.
pub const PLACEHOLDER_PREFIX: &str = "{{binding:";

/// Closing part of every placeholder token.
pub const PLACEHOLDER_SUFFIX: &str = "}}";

/// Build the token string for a placeholder key.
pub fn placeholder_token(key: &str) -> String {
    format!("{PLACEHOLDER_PREFIX}{key}{PLACEHOLDER_SUFFIX}")
}

/// Return the placeholder key if `value` is exactly one token.
///
/// The key must be non-empty and must not contain the closing braces.
pub fn placeholder_key(value: &str) -> Option<&str> {
    let key = value
        .strip_prefix(PLACEHOLDER_PREFIX)?
        .strip_suffix(PLACEHOLDER_SUFFIX)?;

    if key.is_empty() || key.contains(PLACEHOLDER_SUFFIX) {
        return None;
    }
    Some(key)
}
