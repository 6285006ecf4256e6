//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the signed-in membership from a JWT Bearer token.
//! - [`rbac::RequireSecurity`] -- Requires an approved security guard session.
//! - [`rbac::RequireResident`] -- Requires a resident session.
//! - [`rbac::RequireAdministrator`] -- Requires a society administrator session.
//! - [`rbac::RequireSuperadmin`] -- Requires the superadmin.

pub mod auth;
pub mod rbac;
