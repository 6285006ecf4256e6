use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{members, visitors};
use crate::state::AppState;

/// Routes mounted at `/visitors`.
///
/// ```text
/// GET    /                 list_society_visits
/// POST   /                 create_entry
/// GET    /residents        list_resident_options
/// GET    /mine             list_my_visitors
/// POST   /{id}/close       close_visit
/// POST   /{id}/decision    decide_visit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(visitors::list_society_visits).post(visitors::create_entry),
        )
        .route("/residents", get(members::list_resident_options))
        .route("/mine", get(visitors::list_my_visitors))
        .route("/{id}/close", post(visitors::close_visit))
        .route("/{id}/decision", post(visitors::decide_visit))
}
