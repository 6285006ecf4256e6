//! Visitor status values, workflow guards and derived listing filters.
//!
//! A visit moves `pending -> approved -> (exited)` or `pending -> rejected`.
//! `blocked` can be set from any state. "Exited" is not a status value: it is
//! an approved visit whose `exitTime` has been recorded.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Status of a visitor record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisitorStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Blocked,
}

impl VisitorStatus {
    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Blocked => "blocked",
        }
    }
}

/// Visitor gender as captured at the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

/// A resident's decision on a pending visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitDecision {
    Approve,
    Reject,
    Block,
}

impl VisitDecision {
    /// Status the visitor record takes after this decision.
    pub fn resulting_status(self) -> VisitorStatus {
        match self {
            Self::Approve => VisitorStatus::Approved,
            Self::Reject => VisitorStatus::Rejected,
            Self::Block => VisitorStatus::Blocked,
        }
    }
}

/// Check that a resident decision is allowed from the visit's current status.
///
/// Approve and reject only apply to pending visits. Block applies from any
/// state, including an already-blocked one.
pub fn validate_decision(current: VisitorStatus, decision: VisitDecision) -> Result<(), CoreError> {
    match decision {
        VisitDecision::Block => Ok(()),
        VisitDecision::Approve | VisitDecision::Reject if current == VisitorStatus::Pending => {
            Ok(())
        }
        _ => Err(CoreError::Conflict(format!(
            "Visit is {} and can no longer be {}",
            current.name(),
            match decision {
                VisitDecision::Approve => "approved",
                _ => "rejected",
            }
        ))),
    }
}

/// Check that a visit may be closed out at the gate.
///
/// Only an approved visit without a recorded exit can be closed.
pub fn validate_close(
    status: VisitorStatus,
    exit_time: Option<Timestamp>,
) -> Result<(), CoreError> {
    if exit_time.is_some() {
        return Err(CoreError::Conflict("Visit is already closed".into()));
    }
    if status != VisitorStatus::Approved {
        return Err(CoreError::Conflict(format!(
            "Only approved visits can be closed; visit is {}",
            status.name()
        )));
    }
    Ok(())
}

/// Whether the visitor is currently inside the premises.
pub fn is_inside(status: VisitorStatus, exit_time: Option<Timestamp>) -> bool {
    status == VisitorStatus::Approved && exit_time.is_none()
}

/// Whether `entry_time` falls on `day` in the server's local calendar.
pub fn entered_on(entry_time: Timestamp, day: NaiveDate) -> bool {
    entry_time.with_timezone(&Local).date_naive() == day
}

/// Whether `entry_time` falls on the same local calendar day as `now`.
pub fn entered_same_day(entry_time: Timestamp, now: Timestamp) -> bool {
    entered_on(entry_time, now.with_timezone(&Local).date_naive())
}

/// Listing filter used by the gate's visit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisitFilter {
    #[default]
    All,
    Pending,
    Approved,
    Inside,
    Exited,
}

impl VisitFilter {
    /// Apply the filter to a visit's status and exit time.
    ///
    /// `approved` and `inside` are the same predicate: approved without exit.
    pub fn matches(self, status: VisitorStatus, exit_time: Option<Timestamp>) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == VisitorStatus::Pending,
            Self::Approved | Self::Inside => is_inside(status, exit_time),
            Self::Exited => exit_time.is_some(),
        }
    }
}

/// Counts shown on the gate dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitTally {
    pub today: usize,
    pub pending: usize,
    pub inside: usize,
    pub exited: usize,
}

impl VisitTally {
    /// Tally `(status, entry_time, exit_time)` triples against `now`.
    pub fn from_visits<I>(visits: I, now: Timestamp) -> Self
    where
        I: IntoIterator<Item = (VisitorStatus, Timestamp, Option<Timestamp>)>,
    {
        let mut tally = Self::default();
        for (status, entry_time, exit_time) in visits {
            if entered_same_day(entry_time, now) {
                tally.today += 1;
            }
            if status == VisitorStatus::Pending {
                tally.pending += 1;
            }
            if is_inside(status, exit_time) {
                tally.inside += 1;
            }
            if exit_time.is_some() {
                tally.exited += 1;
            }
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn block_allowed_from_any_state() {
        for status in [
            VisitorStatus::Pending,
            VisitorStatus::Approved,
            VisitorStatus::Rejected,
            VisitorStatus::Blocked,
        ] {
            assert!(validate_decision(status, VisitDecision::Block).is_ok());
        }
    }

    #[test]
    fn approve_only_from_pending() {
        assert!(validate_decision(VisitorStatus::Pending, VisitDecision::Approve).is_ok());
        let err = validate_decision(VisitorStatus::Rejected, VisitDecision::Approve).unwrap_err();
        assert!(err.to_string().contains("can no longer be approved"));
    }

    #[test]
    fn reject_after_approval_is_conflict() {
        let err = validate_decision(VisitorStatus::Approved, VisitDecision::Reject).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[test]
    fn close_requires_approval() {
        let err = validate_close(VisitorStatus::Pending, None).unwrap_err();
        assert!(err.to_string().contains("Only approved visits"));
    }

    #[test]
    fn close_twice_is_conflict() {
        let err = validate_close(VisitorStatus::Approved, Some(Utc::now())).unwrap_err();
        assert!(err.to_string().contains("already closed"));
    }

    #[test]
    fn close_open_approved_visit_passes() {
        assert!(validate_close(VisitorStatus::Approved, None).is_ok());
    }

    #[test]
    fn yesterday_is_not_today() {
        let now = Utc::now();
        assert!(!entered_same_day(now - Duration::days(1), now));
        assert!(entered_same_day(now, now));
    }

    #[test]
    fn approved_and_inside_filters_agree() {
        let now = Some(Utc::now());
        for (status, exit) in [
            (VisitorStatus::Approved, None),
            (VisitorStatus::Approved, now),
            (VisitorStatus::Pending, None),
        ] {
            assert_eq!(
                VisitFilter::Approved.matches(status, exit),
                VisitFilter::Inside.matches(status, exit)
            );
        }
    }

    #[test]
    fn exited_filter_ignores_status() {
        assert!(VisitFilter::Exited.matches(VisitorStatus::Rejected, Some(Utc::now())));
        assert!(!VisitFilter::Exited.matches(VisitorStatus::Approved, None));
    }

    #[test]
    fn tally_counts_each_bucket() {
        let now = Utc::now();
        let tally = VisitTally::from_visits(
            [
                (VisitorStatus::Pending, now, None),
                (VisitorStatus::Approved, now, None),
                (VisitorStatus::Approved, now - Duration::days(2), Some(now)),
            ],
            now,
        );
        assert_eq!(tally.today, 2);
        assert_eq!(tally.pending, 1);
        assert_eq!(tally.inside, 1);
        assert_eq!(tally.exited, 1);
    }

    #[test]
    fn default_filter_is_all() {
        assert_eq!(VisitFilter::default(), VisitFilter::All);
        let parsed: VisitFilter = serde_json::from_str("\"inside\"").unwrap();
        assert_eq!(parsed, VisitFilter::Inside);
    }
}
