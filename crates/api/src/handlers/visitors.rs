//! Handlers for the `/visitors` resource.
//!
//! Security guards record entries and close visits for their society;
//! residents see and decide their own visitors.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gatepass_core::validation::VisitorEntry;
use gatepass_core::visitor::VisitDecision;
use gatepass_db::models::visitor::Visitor;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireResident, RequireSecurity};
use crate::query::VisitFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::visits;

/// Body of `POST /visitors/{id}/decision`.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub decision: VisitDecision,
}

/// POST /api/v1/visitors
///
/// Record a gate entry. The visit starts pending resident approval.
pub async fn create_entry(
    RequireSecurity(guard): RequireSecurity,
    State(state): State<AppState>,
    Json(input): Json<VisitorEntry>,
) -> AppResult<impl IntoResponse> {
    let visitor =
        visits::record_entry(&state.context, &guard.user_id, guard.society()?, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: visitor })))
}

/// GET /api/v1/visitors?filter=all|pending|approved|inside|exited
pub async fn list_society_visits(
    RequireSecurity(guard): RequireSecurity,
    State(state): State<AppState>,
    Query(params): Query<VisitFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Visitor>>>> {
    let visits = visits::society_visits(&state.context, guard.society()?, params.filter).await;
    Ok(Json(DataResponse { data: visits }))
}

/// POST /api/v1/visitors/{id}/close
pub async fn close_visit(
    RequireSecurity(guard): RequireSecurity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Visitor>>> {
    let visitor = visits::close_visit(&state.context, guard.society()?, &id).await?;
    Ok(Json(DataResponse { data: visitor }))
}

/// GET /api/v1/visitors/mine
pub async fn list_my_visitors(
    RequireResident(resident): RequireResident,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Visitor>>>> {
    let visits = visits::resident_visits(&state.context, &resident.user_id).await;
    Ok(Json(DataResponse { data: visits }))
}

/// POST /api/v1/visitors/{id}/decision
pub async fn decide_visit(
    RequireResident(resident): RequireResident,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<Json<DataResponse<Visitor>>> {
    let visitor =
        visits::decide_visit(&state.context, &resident.user_id, &id, input.decision).await?;
    Ok(Json(DataResponse { data: visitor }))
}
