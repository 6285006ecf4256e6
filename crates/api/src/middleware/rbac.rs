//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose session role
//! does not match. Society-scoped sessions are additionally rejected once the
//! society's permission window has lapsed.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gatepass_core::error::CoreError;
use gatepass_core::roles::RoleKind;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    role: RoleKind,
    message: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if user.role != role {
        return Err(AppError::Core(CoreError::Forbidden(message.into())));
    }
    if role.is_society_scoped() {
        let society_id = user.society()?;
        if !state.context.is_society_active(society_id).await {
            return Err(AppError::Core(CoreError::Forbidden(
                "Society access has expired. Contact the platform administrator.".into(),
            )));
        }
    }
    Ok(user)
}

/// Requires a security guard session. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn gate_only(RequireSecurity(guard): RequireSecurity) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireSecurity(pub AuthUser);

impl FromRequestParts<AppState> for RequireSecurity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, RoleKind::Security, "Security role required")
            .await
            .map(RequireSecurity)
    }
}

/// Requires a resident session.
pub struct RequireResident(pub AuthUser);

impl FromRequestParts<AppState> for RequireResident {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, RoleKind::Resident, "Resident role required")
            .await
            .map(RequireResident)
    }
}

/// Requires a society administrator session.
pub struct RequireAdministrator(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdministrator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(
            parts,
            state,
            RoleKind::Administrator,
            "Administrator role required",
        )
        .await
        .map(RequireAdministrator)
    }
}

/// Requires the superadmin session.
pub struct RequireSuperadmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperadmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, RoleKind::Superadmin, "Superadmin role required")
            .await
            .map(RequireSuperadmin)
    }
}
