use axum::routing::{get, post};
use axum::Router;

use crate::handlers::pre_approvals;
use crate::state::AppState;

/// Routes mounted at `/pre-approvals`.
///
/// ```text
/// GET    /               list_my_pre_approvals
/// POST   /               create_pre_approval
/// GET    /society        list_society_pre_approvals
/// POST   /{id}/cancel    cancel_pre_approval
/// POST   /{id}/use       use_pre_approval
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(pre_approvals::list_my_pre_approvals).post(pre_approvals::create_pre_approval),
        )
        .route("/society", get(pre_approvals::list_society_pre_approvals))
        .route("/{id}/cancel", post(pre_approvals::cancel_pre_approval))
        .route("/{id}/use", post(pre_approvals::use_pre_approval))
}
