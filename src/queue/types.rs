//! Key layout, rank sentinel and clock helpers.
//!
//! Store layout (shared with any other process using the same store):
//!
//! ```text
//! users:queue:{queue}:wait      waiting users, score = arrival (unix secs)
//! users:queue:{queue}:proceed   admitted users, score = admission (unix secs)
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use super::error::QueueError;

/// Queue used when the caller does not name one.
pub const DEFAULT_QUEUE: &str = "default";

/// Rank reported for a user not present in the wait collection.
pub const NOT_WAITING: i64 = -1;

/// Pattern matching every wait collection.
pub const WAIT_KEY_PATTERN: &str = "users:queue:*:wait";

/// Longest accepted queue name, in bytes.
pub const MAX_QUEUE_NAME_LEN: usize = 128;

/// User identifier as accepted at the boundary.
pub type UserId = i64;

/// Key of a queue's wait collection.
#[inline]
pub fn wait_key(queue: &str) -> String {
    format!("users:queue:{}:wait", queue)
}

/// Key of a queue's proceed collection.
#[inline]
pub fn proceed_key(queue: &str) -> String {
    format!("users:queue:{}:proceed", queue)
}

/// Extract the queue name from a wait key (third `:` segment).
pub fn queue_from_wait_key(key: &str) -> Option<&str> {
    key.split(':').nth(2).filter(|q| !q.is_empty())
}

/// Check that `queue` is a non-empty RFC 6265 cookie token.
///
/// Visible ASCII only, none of the separators. This also keeps `:` out of
/// store keys, so discovery reads back the same name.
pub fn validate_queue_name(queue: &str) -> Result<(), QueueError> {
    let valid = !queue.is_empty()
        && queue.len() <= MAX_QUEUE_NAME_LEN
        && queue.bytes().all(is_token_byte);
    if valid {
        Ok(())
    } else {
        Err(QueueError::InvalidQueueName {
            queue: queue.to_string(),
        })
    }
}

#[inline]
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
}

/// Convert a 0-based store rank into the 1-based boundary rank.
#[inline]
pub fn to_rank(rank: Option<u64>) -> i64 {
    match rank {
        Some(r) => r as i64 + 1,
        None => NOT_WAITING,
    }
}

/// Current unix time in seconds.
#[inline]
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(wait_key("default"), "users:queue:default:wait");
        assert_eq!(proceed_key("default"), "users:queue:default:proceed");
        assert_eq!(queue_from_wait_key("users:queue:concert:wait"), Some("concert"));
        assert_eq!(queue_from_wait_key("users:queue"), None);
        assert_eq!(queue_from_wait_key("users:queue::wait"), None);
    }

    #[test]
    fn test_validate_queue_name() {
        for ok in ["default", "concert-2024", "a.b_c~d", "Q!#$%&'*+^`|"] {
            assert!(validate_queue_name(ok).is_ok(), "{ok}");
        }
        for bad in ["", "a:b", "a;b", "a b", "a=b", "a,b", "a\"b", "a/b", "caf\u{e9}", "a\tb"] {
            assert!(
                matches!(
                    validate_queue_name(bad),
                    Err(QueueError::InvalidQueueName { .. })
                ),
                "{bad:?}"
            );
        }
        assert!(validate_queue_name(&"q".repeat(MAX_QUEUE_NAME_LEN)).is_ok());
        assert!(validate_queue_name(&"q".repeat(MAX_QUEUE_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_to_rank() {
        assert_eq!(to_rank(Some(0)), 1);
        assert_eq!(to_rank(Some(41)), 42);
        assert_eq!(to_rank(None), NOT_WAITING);
    }
}
