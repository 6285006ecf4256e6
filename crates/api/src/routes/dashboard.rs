use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/security", get(dashboard::security_stats))
        .route("/resident", get(dashboard::resident_stats))
        .route("/administrator", get(dashboard::administrator_stats))
        .route("/superadmin", get(dashboard::superadmin_stats))
}
