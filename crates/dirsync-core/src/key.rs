//! Natural-key normalization.
//!
//! Usernames, group names and public-key material are compared
//! case-insensitively everywhere. Two usernames that differ only by case
//! are the same identity.

/// Lowercase form of a natural key.
pub fn normalize(key: &str) -> String {
    key.to_lowercase()
}

/// Case-insensitive equality of two natural keys.
pub fn same_key(a: &str, b: &str) -> bool {
    a == b || normalize(a) == normalize(b)
}
