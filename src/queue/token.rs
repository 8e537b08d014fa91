//! Access token derivation.

use sha2::{Digest, Sha256};

use super::types::UserId;

/// Derive the access token for `(queue, user_id)`: lowercase hex SHA-256 of
/// `user-queue-{queue}-{user_id}`.
pub fn derive_token(queue: &str, user_id: UserId) -> String {
    let input = format!("user-queue-{}-{}", queue, user_id);
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Constant-time byte slice comparison to prevent timing attacks.
#[inline]
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_token_known_digest() {
        let token = derive_token("default", 100);
        assert_eq!(
            token,
            "d333a5d4eb24f3f5cdd767d79b8c01aad3cd73d3537c70dec430455d37afe4b8"
        );
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(token, derive_token("default", 100));
    }

    #[test]
    fn test_derive_token_depends_on_inputs() {
        let base = derive_token("default", 100);
        assert_ne!(base, derive_token("default", 101));
        assert_ne!(base, derive_token("concert", 100));
        assert_ne!(derive_token("a-1", 2), derive_token("a", 12));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
