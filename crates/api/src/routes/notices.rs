use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::notices;
use crate::state::AppState;

/// Routes mounted at `/notices`.
///
/// ```text
/// GET    /        list_notices
/// POST   /        create_notice
/// DELETE /{id}    delete_notice
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notices::list_notices).post(notices::create_notice),
        )
        .route("/{id}", delete(notices::delete_notice))
}
