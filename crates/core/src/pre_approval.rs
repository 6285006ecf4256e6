//! Pre-approval status values.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Status of a resident-issued pre-approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreApprovalStatus {
    #[default]
    Valid,
    Used,
    Expired,
}

impl PreApprovalStatus {
    pub fn name(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Used => "used",
            Self::Expired => "expired",
        }
    }
}

/// Status as observed at `now`: a `valid` pass past its `valid_until` reads as
/// expired even if nobody has written that yet.
pub fn effective_status(
    status: PreApprovalStatus,
    valid_until: Option<Timestamp>,
    now: Timestamp,
) -> PreApprovalStatus {
    match (status, valid_until) {
        (PreApprovalStatus::Valid, Some(until)) if until < now => PreApprovalStatus::Expired,
        (status, _) => status,
    }
}

/// Check that a pass can be redeemed at the gate.
pub fn validate_redeemable(
    status: PreApprovalStatus,
    valid_until: Option<Timestamp>,
    now: Timestamp,
) -> Result<(), CoreError> {
    match effective_status(status, valid_until, now) {
        PreApprovalStatus::Valid => Ok(()),
        other => Err(CoreError::Conflict(format!(
            "Pre-approval is {} and cannot be used",
            other.name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn lapsed_valid_pass_reads_expired() {
        let now = Utc::now();
        assert_eq!(
            effective_status(PreApprovalStatus::Valid, Some(now - Duration::hours(1)), now),
            PreApprovalStatus::Expired
        );
    }

    #[test]
    fn open_ended_pass_stays_valid() {
        let now = Utc::now();
        assert_eq!(
            effective_status(PreApprovalStatus::Valid, None, now),
            PreApprovalStatus::Valid
        );
    }

    #[test]
    fn used_pass_not_redeemable() {
        let now = Utc::now();
        let err = validate_redeemable(PreApprovalStatus::Used, None, now).unwrap_err();
        assert!(err.to_string().contains("is used"));
    }

    #[test]
    fn valid_pass_redeemable() {
        let now = Utc::now();
        assert!(
            validate_redeemable(PreApprovalStatus::Valid, Some(now + Duration::hours(2)), now)
                .is_ok()
        );
    }
}
