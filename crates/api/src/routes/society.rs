use axum::routing::{get, post};
use axum::Router;

use crate::handlers::members;
use crate::state::AppState;

/// Society administrator routes mounted at `/society`.
///
/// ```text
/// GET    /residents                   list_residents
/// GET    /security                    list_security
/// POST   /security                    register_guard
/// GET    /pending                     list_pending_members
/// POST   /members/{user_id}/decision  decide_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/residents", get(members::list_residents))
        .route(
            "/security",
            get(members::list_security).post(members::register_guard),
        )
        .route("/pending", get(members::list_pending_members))
        .route("/members/{user_id}/decision", post(members::decide_member))
}
