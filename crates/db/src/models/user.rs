//! User records and their role memberships.

use gatepass_core::roles::{RoleKind, RoleStatus};
use gatepass_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// A document from the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub name: String,
    /// Stored lower-cased.
    pub email: String,
    /// Stored lower-cased.
    pub login_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub roles: Vec<UserRole>,
    #[serde(default)]
    pub is_resigned: bool,
    pub created_at: Timestamp,
}

/// One `(role, society, status)` membership of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    pub role: RoleKind,
    #[serde(default)]
    pub society_id: Option<RecordId>,
    #[serde(default)]
    pub status: RoleStatus,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub flat_number: Option<String>,
}

impl UserRole {
    pub fn is(&self, role: RoleKind, society_id: Option<&str>) -> bool {
        self.role == role && self.society_id.as_deref() == society_id
    }
}

impl User {
    /// The membership for `role` in `society_id`, whatever its status.
    pub fn role_in(&self, role: RoleKind, society_id: Option<&str>) -> Option<&UserRole> {
        self.roles.iter().find(|r| r.is(role, society_id))
    }

    /// Whether the user holds `role` in `society_id` with the given status.
    pub fn has_role_with_status(
        &self,
        role: RoleKind,
        society_id: Option<&str>,
        status: RoleStatus,
    ) -> bool {
        self.role_in(role, society_id)
            .is_some_and(|r| r.status == status)
    }

    /// Whether the user holds `role` in `society_id` with approved status.
    pub fn has_approved_role(&self, role: RoleKind, society_id: Option<&str>) -> bool {
        self.has_role_with_status(role, society_id, RoleStatus::Approved)
    }

    /// A superadmin who has not resigned.
    pub fn is_active_superadmin(&self) -> bool {
        !self.is_resigned && self.roles.iter().any(|r| r.role == RoleKind::Superadmin)
    }

    /// `"Name (Block-Flat)"` label for a resident of `society_id`.
    pub fn resident_label(&self, society_id: &str) -> String {
        match self.role_in(RoleKind::Resident, Some(society_id)) {
            Some(role) => format!(
                "{} ({}-{})",
                self.name,
                role.block.as_deref().unwrap_or("?"),
                role.flat_number.as_deref().unwrap_or("?")
            ),
            None => self.name.clone(),
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub login_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub roles: Vec<UserRole>,
    #[serde(default)]
    pub is_resigned: bool,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<UserRole>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_resigned: Option<bool>,
}

/// User as returned over the API (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub login_name: String,
    pub roles: Vec<UserRole>,
    pub is_resigned: bool,
    pub created_at: Timestamp,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            login_name: user.login_name,
            roles: user.roles,
            is_resigned: user.is_resigned,
            created_at: user.created_at,
        }
    }
}
