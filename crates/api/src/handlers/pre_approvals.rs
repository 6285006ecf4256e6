//! Handlers for the `/pre-approvals` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gatepass_db::models::pre_approval::PreApproval;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireResident, RequireSecurity};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::pre_approvals::{self, PreApprovalRequest};

/// POST /api/v1/pre-approvals
pub async fn create_pre_approval(
    RequireResident(resident): RequireResident,
    State(state): State<AppState>,
    Json(input): Json<PreApprovalRequest>,
) -> AppResult<impl IntoResponse> {
    let pass = pre_approvals::create(
        &state.context,
        &resident.user_id,
        resident.society()?,
        input,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: pass })))
}

/// GET /api/v1/pre-approvals
pub async fn list_my_pre_approvals(
    RequireResident(resident): RequireResident,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PreApproval>>>> {
    let passes = pre_approvals::for_resident(&state.context, &resident.user_id).await;
    Ok(Json(DataResponse { data: passes }))
}

/// POST /api/v1/pre-approvals/{id}/cancel
pub async fn cancel_pre_approval(
    RequireResident(resident): RequireResident,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<PreApproval>>> {
    let pass = pre_approvals::cancel(&state.context, &resident.user_id, &id).await?;
    Ok(Json(DataResponse { data: pass }))
}

/// GET /api/v1/pre-approvals/society
pub async fn list_society_pre_approvals(
    RequireSecurity(guard): RequireSecurity,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PreApproval>>>> {
    let passes = pre_approvals::for_society(&state.context, guard.society()?).await;
    Ok(Json(DataResponse { data: passes }))
}

/// POST /api/v1/pre-approvals/{id}/use
pub async fn use_pre_approval(
    RequireSecurity(guard): RequireSecurity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<PreApproval>>> {
    let pass = pre_approvals::mark_used(&state.context, guard.society()?, &id).await?;
    Ok(Json(DataResponse { data: pass }))
}
