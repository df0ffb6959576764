//! Unique-name generation for buckets and local fixture files.
//!
//! Names are a caller-chosen prefix followed by a freshly generated random
//! 128-bit token rendered as lowercase hex. No validation happens here; the
//! caller owns any length or character constraints on the combined name.

use uuid::Uuid;

/// Number of hex characters in a full token.
pub const FULL_TOKEN_LEN: usize = 32;

/// Default token length for local file-name disambiguation.
///
/// Six hex characters (24 bits) keep directories with many fixture files from
/// clustering on a shared prefix, at the cost of a small but non-zero collision
/// probability. Callers that need the full 128 bits pass [`FULL_TOKEN_LEN`].
pub const DEFAULT_FILE_TOKEN_LEN: usize = 6;

/// Generate a fresh 32-character lowercase hex token.
pub fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Produce `prefix + token` with the full 32-character token.
///
/// Used for bucket names, which share a global namespace: with 128 random bits
/// the chance of colliding with any existing name is negligible.
pub fn unique_name(prefix: &str) -> String {
    format!("{}{}", prefix, unique_suffix())
}

/// Prepend a truncated random token to a file name.
///
/// `token_len` is clamped to the full token length. Truncation reduces
/// collision resistance; it is the caller's tradeoff to make.
pub fn disambiguate(file_name: &str, token_len: usize) -> String {
    let token = unique_suffix();
    let token_len = token_len.min(FULL_TOKEN_LEN);
    format!("{}{}", &token[..token_len], file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn unique_suffix_is_full_lowercase_hex() {
        let token = unique_suffix();
        assert_eq!(token.len(), FULL_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn unique_names_are_distinct() {
        let names: HashSet<String> = (0..1000).map(|_| unique_name("bucket-")).collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn disambiguate_honors_token_len() {
        let name = disambiguate("data.txt", 6);
        assert_eq!(name.len(), 6 + "data.txt".len());
        assert!(name.ends_with("data.txt"));

        // Requesting more than a full token just uses the full token
        let name = disambiguate("data.txt", 64);
        assert_eq!(name.len(), FULL_TOKEN_LEN + "data.txt".len());
    }

    #[test]
    fn unique_name_keeps_prefix() {
        let name = unique_name("demo-");
        assert!(name.starts_with("demo-"));
        assert_eq!(name.len(), "demo-".len() + FULL_TOKEN_LEN);
    }
}
