use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /login        login
/// POST   /register     register
/// POST   /bootstrap    bootstrap
/// GET    /me           me
/// POST   /roles        request_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/bootstrap", post(auth::bootstrap))
        .route("/me", get(auth::me))
        .route("/roles", post(auth::request_role))
}
