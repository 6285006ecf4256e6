//! Handlers for the per-role `/dashboard` counters.

use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::rbac::{
    RequireAdministrator, RequireResident, RequireSecurity, RequireSuperadmin,
};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::dashboard::{
    self, AdministratorStats, ResidentStats, SecurityStats, SuperadminStats,
};

/// GET /api/v1/dashboard/security
pub async fn security_stats(
    RequireSecurity(guard): RequireSecurity,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SecurityStats>>> {
    let data = dashboard::security(&state.context, guard.society()?).await;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/dashboard/resident
pub async fn resident_stats(
    RequireResident(resident): RequireResident,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ResidentStats>>> {
    let data = dashboard::resident(&state.context, &resident.user_id).await;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/dashboard/administrator
pub async fn administrator_stats(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AdministratorStats>>> {
    let data = dashboard::administrator(&state.context, admin.society()?).await;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/dashboard/superadmin
pub async fn superadmin_stats(
    RequireSuperadmin(_admin): RequireSuperadmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SuperadminStats>>> {
    let data = dashboard::superadmin(&state.context).await;
    Ok(Json(DataResponse { data }))
}
