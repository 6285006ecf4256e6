//! Handlers for the `/auth` resource (login, registration, bootstrap).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gatepass_core::error::CoreError;
use gatepass_core::roles::{RoleKind, RoleStatus};
use gatepass_core::types::RecordId;
use gatepass_core::validation::Registration;
use gatepass_db::models::user::{User, UserRole, UserSummary};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::membership::{self, NewAccount, RoleRequest};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login name or email.
    pub login: String,
    pub password: String,
    /// Membership to sign in as. Defaults to the first approved one.
    pub role: Option<RoleKind>,
    pub society_id: Option<RecordId>,
}

/// Successful login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub role: RoleKind,
    pub society_id: Option<RecordId>,
    pub user: UserSummary,
}

/// The signed-in session and its account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub role: RoleKind,
    pub society_id: Option<RecordId>,
    pub user: UserSummary,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with login name (or email) + password and choose the
/// membership to act as.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid login or password".into()));
    let ctx = &state.context;

    let user = if input.login.contains('@') {
        ctx.get_user_by_email(&input.login).await
    } else {
        ctx.get_user_by_login_name(&input.login).await
    }
    .ok_or_else(invalid)?;

    let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
    let password_valid = verify_password(&input.password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    if user.is_resigned {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let membership = choose_membership(&user, input.role, input.society_id.as_deref())?;
    if let Some(society_id) = membership.society_id.as_deref() {
        if !ctx.is_society_active(society_id).await {
            return Err(AppError::Core(CoreError::Forbidden(
                "Society access has expired. Contact the platform administrator.".into(),
            )));
        }
    }

    let access_token = generate_access_token(
        &user.id,
        membership.role,
        membership.society_id.as_deref(),
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = %user.id, role = %membership.role, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        role: membership.role,
        society_id: membership.society_id.clone(),
        user: user.clone().into(),
    }))
}

/// POST /api/v1/auth/register
///
/// Create an account with one pending role request.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<Registration>,
) -> AppResult<impl IntoResponse> {
    let user = membership::register(&state.context, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserSummary::from(user),
        }),
    ))
}

/// POST /api/v1/auth/bootstrap
///
/// Create the superadmin. Fails with 409 once one exists.
pub async fn bootstrap(
    State(state): State<AppState>,
    Json(input): Json<NewAccount>,
) -> AppResult<impl IntoResponse> {
    let user = membership::bootstrap_superadmin(&state.context, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserSummary::from(user),
        }),
    ))
}

/// GET /api/v1/auth/me
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SessionInfo>>> {
    let user = state
        .context
        .get_user_by_id(&auth.user_id)
        .await
        .ok_or_else(|| CoreError::not_found("User", auth.user_id.as_str()))?;
    Ok(Json(DataResponse {
        data: SessionInfo {
            role: auth.role,
            society_id: auth.society_id,
            user: user.into(),
        },
    }))
}

/// POST /api/v1/auth/roles
///
/// Request an additional membership for the signed-in account.
pub async fn request_role(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RoleRequest>,
) -> AppResult<impl IntoResponse> {
    let user = membership::request_role(&state.context, &auth.user_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserSummary::from(user),
        }),
    ))
}

/// Pick the approved membership the session will act as.
fn choose_membership<'a>(
    user: &'a User,
    role: Option<RoleKind>,
    society_id: Option<&str>,
) -> AppResult<&'a UserRole> {
    let candidates = user.roles.iter().filter(|r| {
        role.is_none_or(|wanted| r.role == wanted)
            && society_id.is_none_or(|wanted| r.society_id.as_deref() == Some(wanted))
    });

    let mut pending = false;
    for membership in candidates {
        match membership.status {
            RoleStatus::Approved => return Ok(membership),
            RoleStatus::Pending => pending = true,
            RoleStatus::Rejected => {}
        }
    }

    let message = if pending {
        "Your registration is awaiting approval"
    } else {
        "No approved membership for this account"
    };
    Err(AppError::Core(CoreError::Forbidden(message.into())))
}
