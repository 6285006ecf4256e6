//! Accounts and role memberships: registration, superadmin bootstrap,
//! approval of pending requests and guard registration.

use gatepass_core::error::CoreError;
use gatepass_core::roles::{validate_membership_decision, RoleKind, RoleStatus};
use gatepass_core::validation::{validate_input, Registration};
use gatepass_db::models::user::{CreateUser, UpdateUser, User, UserRole};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::hash_password;
use crate::context::DataContext;
use crate::error::{AppError, AppResult};

/// Account details for accounts created on someone's behalf (superadmin
/// bootstrap, guard registration by an administrator).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 3, max = 32, message = "Login name must be 3 to 32 characters"))]
    pub login_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
}

/// A signed-in user asking for one more role.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    pub role: RoleKind,
    pub society_id: String,
    pub block: Option<String>,
    pub flat_number: Option<String>,
}

/// Self-registration: a new account with one pending role request.
pub async fn register(ctx: &DataContext, input: Registration) -> AppResult<User> {
    validate_input(&input)?;
    let society_id = input
        .society_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| CoreError::Validation("Please select a society".into()))?;
    let role = pending_role(
        ctx,
        input.role,
        society_id,
        input.block.clone(),
        input.flat_number.clone(),
    )
    .await?;

    ensure_unique(ctx, &input.email, &input.login_name).await?;
    let user = ctx
        .add_user(&CreateUser {
            name: input.name.trim().to_string(),
            email: input.email,
            login_name: input.login_name,
            password_hash: Some(hash(&input.password)?),
            roles: vec![role],
            is_resigned: false,
        })
        .await?;

    tracing::info!(user_id = %user.id, role = %input.role, %society_id, "Registration submitted");
    Ok(user)
}

/// Add a pending role request to an existing account.
pub async fn request_role(ctx: &DataContext, user_id: &str, input: RoleRequest) -> AppResult<User> {
    let user = ctx
        .get_user_by_id(user_id)
        .await
        .ok_or_else(|| CoreError::not_found("User", user_id))?;
    if user.role_in(input.role, Some(&input.society_id)).is_some() {
        return Err(CoreError::Conflict(format!(
            "A {} membership for this society already exists",
            input.role
        ))
        .into());
    }
    let role = pending_role(
        ctx,
        input.role,
        &input.society_id,
        input.block,
        input.flat_number,
    )
    .await?;

    let mut roles = user.roles;
    roles.push(role);
    let user = ctx
        .update_user(
            user_id,
            &UpdateUser {
                roles: Some(roles),
                ..Default::default()
            },
        )
        .await?;
    tracing::info!(
        user_id = %user_id,
        role = %input.role,
        society_id = %input.society_id,
        "Role requested"
    );
    Ok(user)
}

/// Create the platform superadmin. Only allowed while none is active.
pub async fn bootstrap_superadmin(ctx: &DataContext, input: NewAccount) -> AppResult<User> {
    validate_input(&input)?;
    ctx.refresh().await;
    if ctx.has_superadmin().await {
        return Err(CoreError::Conflict("A superadmin already exists".into()).into());
    }
    let user = create_account(
        ctx,
        input,
        UserRole {
            role: RoleKind::Superadmin,
            society_id: None,
            status: RoleStatus::Approved,
            block: None,
            flat_number: None,
        },
    )
    .await?;
    tracing::info!(user_id = %user.id, "Superadmin created");
    Ok(user)
}

/// Register an approved security guard for `society_id`.
pub async fn register_guard(
    ctx: &DataContext,
    society_id: &str,
    input: NewAccount,
) -> AppResult<User> {
    validate_input(&input)?;
    let user = create_account(
        ctx,
        input,
        UserRole {
            role: RoleKind::Security,
            society_id: Some(society_id.to_string()),
            status: RoleStatus::Approved,
            block: None,
            flat_number: None,
        },
    )
    .await?;
    tracing::info!(user_id = %user.id, %society_id, "Security guard registered");
    Ok(user)
}

/// Approve or reject the pending `(role, society)` membership of a user.
pub async fn decide_membership(
    ctx: &DataContext,
    user_id: &str,
    role: RoleKind,
    society_id: Option<&str>,
    decision: RoleStatus,
) -> AppResult<User> {
    let user = ctx
        .get_user_by_id(user_id)
        .await
        .ok_or_else(|| CoreError::not_found("User", user_id))?;
    let current = user
        .role_in(role, society_id)
        .map(|r| r.status)
        .ok_or_else(|| CoreError::not_found("Membership", format!("{user_id}/{role}")))?;

    validate_membership_decision(current, decision)?;

    let roles = user
        .roles
        .into_iter()
        .map(|mut r| {
            if r.is(role, society_id) {
                r.status = decision;
            }
            r
        })
        .collect();
    let user = ctx
        .update_user(
            user_id,
            &UpdateUser {
                roles: Some(roles),
                ..Default::default()
            },
        )
        .await?;
    tracing::info!(
        user_id = %user_id,
        role = %role,
        society_id = ?society_id,
        decision = decision.name(),
        "Membership decided"
    );
    Ok(user)
}

/// Pending requests an administrator of `society_id` can decide.
pub async fn pending_society_requests(ctx: &DataContext, society_id: &str) -> Vec<User> {
    let mut users = ctx.pending_residents(society_id).await;
    for guard in ctx.pending_security(society_id).await {
        if !users.iter().any(|u| u.id == guard.id) {
            users.push(guard);
        }
    }
    users
}

async fn pending_role(
    ctx: &DataContext,
    role: RoleKind,
    society_id: &str,
    block: Option<String>,
    flat_number: Option<String>,
) -> AppResult<UserRole> {
    if !role.is_self_service() {
        return Err(CoreError::Validation(format!("The {role} role cannot be requested")).into());
    }
    if ctx.society_by_id(society_id).await.is_none() {
        return Err(CoreError::not_found("Society", society_id).into());
    }
    let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
    if role == RoleKind::Resident && (blank(&block) || blank(&flat_number)) {
        return Err(CoreError::Validation(
            "Block and flat number are required for residents".into(),
        )
        .into());
    }
    Ok(UserRole {
        role,
        society_id: Some(society_id.to_string()),
        status: RoleStatus::Pending,
        block,
        flat_number,
    })
}

async fn create_account(ctx: &DataContext, input: NewAccount, role: UserRole) -> AppResult<User> {
    ensure_unique(ctx, &input.email, &input.login_name).await?;
    let user = ctx
        .add_user(&CreateUser {
            name: input.name.trim().to_string(),
            email: input.email,
            login_name: input.login_name,
            password_hash: Some(hash(&input.password)?),
            roles: vec![role],
            is_resigned: false,
        })
        .await?;
    Ok(user)
}

async fn ensure_unique(ctx: &DataContext, email: &str, login_name: &str) -> AppResult<()> {
    if ctx.get_user_by_email(email).await.is_some() {
        return Err(CoreError::Conflict("An account with this email already exists".into()).into());
    }
    if ctx.get_user_by_login_name(login_name).await.is_some() {
        return Err(CoreError::Conflict("This login name is already taken".into()).into());
    }
    Ok(())
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}
