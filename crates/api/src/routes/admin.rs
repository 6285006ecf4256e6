use axum::routing::{get, post};
use axum::Router;

use crate::handlers::members;
use crate::state::AppState;

/// Superadmin routes mounted at `/admin`.
///
/// ```text
/// GET    /administrators/pending              list_pending_administrators
/// POST   /administrators/{user_id}/decision   decide_administrator
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/administrators/pending",
            get(members::list_pending_administrators),
        )
        .route(
            "/administrators/{user_id}/decision",
            post(members::decide_administrator),
        )
}
