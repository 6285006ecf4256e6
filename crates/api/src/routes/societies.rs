use axum::routing::get;
use axum::Router;

use crate::handlers::societies;
use crate::state::AppState;

/// Routes mounted at `/societies`.
///
/// ```text
/// GET    /        list_societies
/// POST   /        create_society
/// GET    /{id}    get_society
/// PUT    /{id}    update_society
/// DELETE /{id}    delete_society
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(societies::list_societies).post(societies::create_society),
        )
        .route(
            "/{id}",
            get(societies::get_society)
                .put(societies::update_society)
                .delete(societies::delete_society),
        )
}
