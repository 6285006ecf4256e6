//! Handlers for the `/notices` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gatepass_core::error::CoreError;
use gatepass_db::models::notice::{CreateNotice, Notice};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdministrator;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /notices`.
#[derive(Debug, Deserialize)]
pub struct NoticeRequest {
    pub title: String,
    pub content: String,
}

/// GET /api/v1/notices
///
/// Notices of the session's society, newest first.
pub async fn list_notices(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Notice>>>> {
    let mut notices = state.context.notices_by_society(auth.society()?).await;
    notices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(DataResponse { data: notices }))
}

/// POST /api/v1/notices
pub async fn create_notice(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
    Json(input): Json<NoticeRequest>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(CoreError::Validation("Title and content are required".into()).into());
    }
    let notice = state
        .context
        .add_notice(&CreateNotice {
            society_id: admin.society()?.to_string(),
            title: input.title.trim().to_string(),
            content: input.content,
            created_by: Some(admin.user_id.clone()),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: notice })))
}

/// DELETE /api/v1/notices/{id}
pub async fn delete_notice(
    RequireAdministrator(admin): RequireAdministrator,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let owned = state
        .context
        .notices_by_society(admin.society()?)
        .await
        .iter()
        .any(|n| n.id == id);
    if !owned {
        return Err(CoreError::not_found("Notice", id).into());
    }
    state.context.delete_notice(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
