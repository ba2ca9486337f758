//! Transfer window policy. Every input is a parameter; nothing reads the clock.
use chrono::{DateTime, Utc};

use crate::config::TransferWindowConfig;

/// True iff `user_id` is present, non-empty and on the allow-list. Fail-closed.
pub fn can_bypass_transfer_window(user_id: Option<&str>, allow_list: &[String]) -> bool {
    match user_id {
        Some(id) if !id.is_empty() => allow_list.iter().any(|allowed| allowed == id),
        _ => false,
    }
}

/// Half-open interval: `opens_at <= now < closes_at`.
pub fn is_window_open(now: DateTime<Utc>, config: &TransferWindowConfig) -> bool {
    config.opens_at <= now && now < config.closes_at
}

pub fn is_transfer_permitted(
    now: DateTime<Utc>,
    config: &TransferWindowConfig,
    acting_user: Option<&str>,
) -> bool {
    is_window_open(now, config) || can_bypass_transfer_window(acting_user, &config.bypass_user_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn window() -> TransferWindowConfig {
        TransferWindowConfig {
            opens_at: Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap(),
            closes_at: Utc.with_ymd_and_hms(2026, 8, 8, 10, 0, 0).unwrap(),
            bypass_user_ids: vec!["admin_1".to_string()],
        }
    }

    #[test]
    fn open_boundary_is_inclusive() {
        let config = window();
        assert!(is_window_open(config.opens_at, &config));
    }

    #[test]
    fn close_boundary_is_exclusive() {
        let config = window();
        assert!(!is_window_open(config.closes_at, &config));
        assert!(is_window_open(config.closes_at - Duration::seconds(1), &config));
    }

    #[test]
    fn before_open_is_closed() {
        let config = window();
        assert!(!is_window_open(config.opens_at - Duration::seconds(1), &config));
    }

    #[test]
    fn bypass_fails_closed() {
        let allow = window().bypass_user_ids;

        assert!(!can_bypass_transfer_window(None, &allow));
        assert!(!can_bypass_transfer_window(Some(""), &allow));
        assert!(!can_bypass_transfer_window(Some("user_2"), &allow));
        assert!(can_bypass_transfer_window(Some("admin_1"), &allow));
    }

    #[test]
    fn empty_allow_list_never_bypasses() {
        assert!(!can_bypass_transfer_window(Some("admin_1"), &[]));
    }

    #[test]
    fn permitted_when_open_or_bypassed() {
        let config = window();
        let inside = config.opens_at + Duration::days(1);
        let after = config.closes_at + Duration::days(1);

        assert!(is_transfer_permitted(inside, &config, None));
        assert!(!is_transfer_permitted(after, &config, None));
        assert!(!is_transfer_permitted(after, &config, Some("user_2")));
        assert!(is_transfer_permitted(after, &config, Some("admin_1")));
    }
}
