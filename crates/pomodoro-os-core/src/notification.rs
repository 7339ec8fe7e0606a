//! Transient user-facing notifications.

use serde::{Deserialize, Serialize};

pub const SESSION_COMPLETE: &str = "SESSION COMPLETE";
pub const LOG_DELETED: &str = "LOG DELETED";
pub const PROJECT_ADDED: &str = "PROJECT ADDED";

/// A message shown until `expires_at_ms`. A newer one replaces it outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub expires_at_ms: i64,
}

impl Notification {
    pub fn new(message: impl Into<String>, now_ms: i64, lifetime_ms: u64) -> Self {
        let lifetime_ms = i64::try_from(lifetime_ms).unwrap_or(i64::MAX);
        Self {
            message: message.into(),
            expires_at_ms: now_ms.saturating_add(lifetime_ms),
        }
    }

    pub fn is_visible(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_until_expiry() {
        let n = Notification::new(LOG_DELETED, 1_000, 3_000);
        assert!(n.is_visible(1_000));
        assert!(n.is_visible(3_999));
        assert!(!n.is_visible(4_000));
    }

    #[test]
    fn huge_lifetime_saturates() {
        let n = Notification::new(SESSION_COMPLETE, 1_000, u64::MAX);
        assert_eq!(n.expires_at_ms, i64::MAX);
        assert!(n.is_visible(1_000_000));
    }
}
