//! Handlers for membership administration.
//!
//! The superadmin decides administrator requests for any society; a society
//! administrator decides resident and security requests of their own society
//! and registers guards directly.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gatepass_core::error::CoreError;
use gatepass_core::roles::{RoleKind, RoleStatus};
use gatepass_core::types::RecordId;
use gatepass_db::models::user::UserSummary;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdministrator, RequireSecurity, RequireSuperadmin};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::membership::{self, NewAccount};

/// Body of the membership decision endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipDecision {
    pub role: RoleKind,
    pub society_id: Option<RecordId>,
    pub status: RoleStatus,
}

/// A resident as offered in the gate entry form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentOption {
    pub id: RecordId,
    pub label: String,
}

fn summaries(users: Vec<gatepass_db::models::user::User>) -> Vec<UserSummary> {
    users.into_iter().map(UserSummary::from).collect()
}

// ---------------------------------------------------------------------------
// Superadmin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/administrators/pending
pub async fn list_pending_administrators(
    RequireSuperadmin(_admin): RequireSuperadmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    let users = state.context.pending_administrators().await;
    Ok(Json(DataResponse {
        data: summaries(users),
    }))
}

/// POST /api/v1/admin/administrators/{user_id}/decision
pub async fn decide_administrator(
    RequireSuperadmin(admin): RequireSuperadmin,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<MembershipDecision>,
) -> AppResult<Json<DataResponse<UserSummary>>> {
    if input.role != RoleKind::Administrator {
        return Err(CoreError::Validation(
            "Only administrator requests are decided here".into(),
        )
        .into());
    }
    let society_id = input
        .society_id
        .as_deref()
        .ok_or_else(|| CoreError::Validation("societyId is required".into()))?;
    let user = membership::decide_membership(
        &state.context,
        &user_id,
        RoleKind::Administrator,
        Some(society_id),
        input.status,
    )
    .await?;
    tracing::info!(by = %admin.user_id, %user_id, "Administrator request decided");
    Ok(Json(DataResponse { data: user.into() }))
}

// ---------------------------------------------------------------------------
// Society administrator
// ---------------------------------------------------------------------------

/// GET /api/v1/society/residents
pub async fn list_residents(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    let users = state.context.residents_by_society(admin.society()?).await;
    Ok(Json(DataResponse {
        data: summaries(users),
    }))
}

/// GET /api/v1/society/security
pub async fn list_security(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    let users = state.context.security_by_society(admin.society()?).await;
    Ok(Json(DataResponse {
        data: summaries(users),
    }))
}

/// GET /api/v1/society/pending
pub async fn list_pending_members(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    let users = membership::pending_society_requests(&state.context, admin.society()?).await;
    Ok(Json(DataResponse {
        data: summaries(users),
    }))
}

/// POST /api/v1/society/members/{user_id}/decision
pub async fn decide_member(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<MembershipDecision>,
) -> AppResult<Json<DataResponse<UserSummary>>> {
    if !matches!(input.role, RoleKind::Resident | RoleKind::Security) {
        return Err(CoreError::Forbidden(
            "Administrators decide resident and security requests only".into(),
        )
        .into());
    }
    let user = membership::decide_membership(
        &state.context,
        &user_id,
        input.role,
        Some(admin.society()?),
        input.status,
    )
    .await?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// POST /api/v1/society/security
pub async fn register_guard(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
    Json(input): Json<NewAccount>,
) -> AppResult<impl IntoResponse> {
    let user = membership::register_guard(&state.context, admin.society()?, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserSummary::from(user),
        }),
    ))
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// GET /api/v1/visitors/residents
///
/// Approved residents of the guard's society, labelled `Name (Block-Flat)`.
pub async fn list_resident_options(
    RequireSecurity(guard): RequireSecurity,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ResidentOption>>>> {
    let society_id = guard.society()?;
    let options = state
        .context
        .residents_by_society(society_id)
        .await
        .into_iter()
        .filter(|u| u.has_approved_role(RoleKind::Resident, Some(society_id)))
        .map(|u| ResidentOption {
            label: u.resident_label(society_id),
            id: u.id,
        })
        .collect();
    Ok(Json(DataResponse { data: options }))
}
