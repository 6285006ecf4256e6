pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod notices;
pub mod pre_approvals;
pub mod societies;
pub mod society;
pub mod visitors;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/register                                   self-registration (public)
/// /auth/bootstrap                                  create superadmin (public, once)
/// /auth/me                                         current session
/// /auth/roles                                      request another membership
///
/// /societies                                       list, create (superadmin)
/// /societies/{id}                                  get (member), update, delete (superadmin)
///
/// /admin/administrators/pending                    pending administrator requests (superadmin)
/// /admin/administrators/{user_id}/decision         approve / reject (superadmin)
///
/// /society/residents                               residents of own society (administrator)
/// /society/security                                list, register guard (administrator)
/// /society/pending                                 pending resident / guard requests
/// /society/members/{user_id}/decision              approve / reject (administrator)
///
/// /visitors                                        list (?filter=), record entry (security)
/// /visitors/residents                              resident picker for the entry form
/// /visitors/{id}/close                             record exit (security)
/// /visitors/mine                                   own visitors (resident)
/// /visitors/{id}/decision                          approve / reject / block (resident)
///
/// /notices                                         list (member), create (administrator)
/// /notices/{id}                                    delete (administrator)
///
/// /pre-approvals                                   list own, create (resident)
/// /pre-approvals/{id}/cancel                       cancel (resident)
/// /pre-approvals/society                           society passes (security)
/// /pre-approvals/{id}/use                          mark used (security)
///
/// /dashboard/security                              gate counters
/// /dashboard/resident                              resident counters
/// /dashboard/administrator                         society counters
/// /dashboard/superadmin                            platform counters
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/societies", societies::router())
        .nest("/admin", admin::router())
        .nest("/society", society::router())
        .nest("/visitors", visitors::router())
        .nest("/notices", notices::router())
        .nest("/pre-approvals", pre_approvals::router())
        .nest("/dashboard", dashboard::router())
}
