//! Role kinds and role-membership status.
//!
//! A user holds any number of roles, each scoped to one society (except
//! `superadmin`, which is platform-wide). The wire names below are the
//! values stored in `User.roles[].role` and `User.roles[].status`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_SUPERADMIN: &str = "superadmin";
pub const ROLE_ADMINISTRATOR: &str = "administrator";
pub const ROLE_RESIDENT: &str = "resident";
pub const ROLE_SECURITY: &str = "security";

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

/// The kind of a role attached to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Superadmin,
    Administrator,
    Resident,
    Security,
}

impl RoleKind {
    /// Parse from the stored role name.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            ROLE_SUPERADMIN => Ok(Self::Superadmin),
            ROLE_ADMINISTRATOR => Ok(Self::Administrator),
            ROLE_RESIDENT => Ok(Self::Resident),
            ROLE_SECURITY => Ok(Self::Security),
            other => Err(CoreError::Validation(format!(
                "Unknown role '{other}'. Must be one of: {ROLE_SUPERADMIN}, \
                 {ROLE_ADMINISTRATOR}, {ROLE_RESIDENT}, {ROLE_SECURITY}"
            ))),
        }
    }

    /// Stored role name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Superadmin => ROLE_SUPERADMIN,
            Self::Administrator => ROLE_ADMINISTRATOR,
            Self::Resident => ROLE_RESIDENT,
            Self::Security => ROLE_SECURITY,
        }
    }

    /// Whether this role must be scoped to a society.
    pub fn is_society_scoped(self) -> bool {
        !matches!(self, Self::Superadmin)
    }

    /// Roles a user may request through self-registration.
    pub fn is_self_service(self) -> bool {
        matches!(self, Self::Administrator | Self::Resident | Self::Security)
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Approval status of a single role membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoleStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RoleStatus {
    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Approved => STATUS_APPROVED,
            Self::Rejected => STATUS_REJECTED,
        }
    }
}

/// Check that a membership decision moves a role out of `pending`.
///
/// Administrators may only decide pending requests; re-deciding an already
/// approved or rejected membership is a conflict.
pub fn validate_membership_decision(
    current: RoleStatus,
    decision: RoleStatus,
) -> Result<(), CoreError> {
    if decision == RoleStatus::Pending {
        return Err(CoreError::Validation(
            "A membership decision must be approved or rejected".into(),
        ));
    }
    if current != RoleStatus::Pending {
        return Err(CoreError::Conflict(format!(
            "Membership is already {}",
            current.name()
        )));
    }
    Ok(())
}
