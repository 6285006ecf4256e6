//! Society permission window.
//!
//! A society can use the system only while the current time lies inside its
//! `[permissionFromDate, permissionToDate]` window, both ends inclusive.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Whether `now` lies within the inclusive permission window.
pub fn is_within_permission(from: Timestamp, to: Timestamp, now: Timestamp) -> bool {
    from <= now && now <= to
}

/// Validate that a permission window is not inverted.
pub fn validate_permission_window(from: Timestamp, to: Timestamp) -> Result<(), CoreError> {
    if to < from {
        return Err(CoreError::Validation(
            "permissionToDate must not be earlier than permissionFromDate".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn inside_window_is_active() {
        let now = Utc::now();
        assert!(is_within_permission(
            now - Duration::days(1),
            now + Duration::days(1),
            now
        ));
    }

    #[test]
    fn window_edges_are_inclusive() {
        let now = Utc::now();
        assert!(is_within_permission(now, now + Duration::days(1), now));
        assert!(is_within_permission(now - Duration::days(1), now, now));
    }

    #[test]
    fn expired_window_is_inactive() {
        let now = Utc::now();
        assert!(!is_within_permission(
            now - Duration::days(30),
            now - Duration::days(1),
            now
        ));
    }

    #[test]
    fn future_window_is_inactive() {
        let now = Utc::now();
        assert!(!is_within_permission(
            now + Duration::days(1),
            now + Duration::days(30),
            now
        ));
    }

    #[test]
    fn inverted_window_rejected() {
        let now = Utc::now();
        assert!(validate_permission_window(now, now - Duration::seconds(1)).is_err());
        assert!(validate_permission_window(now, now).is_ok());
    }
}
