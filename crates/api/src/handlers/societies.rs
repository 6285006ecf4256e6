//! Handlers for the `/societies` resource (superadmin).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use gatepass_core::error::CoreError;
use gatepass_core::society::validate_permission_window;
use gatepass_db::models::society::{CreateSociety, Society, UpdateSociety};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSuperadmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// A society with its permission status at request time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocietyView {
    #[serde(flatten)]
    pub society: Society,
    pub is_active: bool,
}

impl From<Society> for SocietyView {
    fn from(society: Society) -> Self {
        let is_active = society.is_active_at(Utc::now());
        Self { society, is_active }
    }
}

/// GET /api/v1/societies
pub async fn list_societies(
    RequireSuperadmin(_admin): RequireSuperadmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SocietyView>>>> {
    let societies = state.context.societies().await;
    Ok(Json(DataResponse {
        data: societies.into_iter().map(SocietyView::from).collect(),
    }))
}

/// GET /api/v1/societies/{id}
///
/// Any signed-in user may read their own society; the superadmin any.
pub async fn get_society(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<SocietyView>>> {
    if auth.society_id.as_deref().is_some_and(|own| own != id) {
        return Err(CoreError::Forbidden("Not a member of this society".into()).into());
    }
    let society = state
        .context
        .society_by_id(&id)
        .await
        .ok_or_else(|| CoreError::not_found("Society", id.as_str()))?;
    Ok(Json(DataResponse {
        data: society.into(),
    }))
}

/// POST /api/v1/societies
pub async fn create_society(
    RequireSuperadmin(_admin): RequireSuperadmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSociety>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Society name is required".into()).into());
    }
    validate_permission_window(input.permission_from_date, input.permission_to_date)?;
    let society = state.context.add_society(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SocietyView::from(society),
        }),
    ))
}

/// PUT /api/v1/societies/{id}
///
/// Rename or renew a society's permission window.
pub async fn update_society(
    RequireSuperadmin(_admin): RequireSuperadmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateSociety>,
) -> AppResult<Json<DataResponse<SocietyView>>> {
    let current = state
        .context
        .fetch_society_by_id(&id)
        .await
        .ok_or_else(|| CoreError::not_found("Society", id.as_str()))?;
    validate_permission_window(
        input.permission_from_date.unwrap_or(current.permission_from_date),
        input.permission_to_date.unwrap_or(current.permission_to_date),
    )?;
    let society = state.context.update_society(&id, &input).await?;
    tracing::info!(society_id = %id, "Society updated");
    Ok(Json(DataResponse {
        data: society.into(),
    }))
}

/// DELETE /api/v1/societies/{id}
pub async fn delete_society(
    RequireSuperadmin(_admin): RequireSuperadmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.context.delete_society(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
