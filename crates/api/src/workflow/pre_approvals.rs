//! Resident pre-approvals for expected visitors.

use chrono::{DateTime, Utc};
use gatepass_core::error::CoreError;
use gatepass_core::pre_approval::{effective_status, validate_redeemable, PreApprovalStatus};
use gatepass_db::models::pre_approval::{CreatePreApproval, PreApproval, UpdatePreApproval};
use serde::Deserialize;

use crate::context::DataContext;
use crate::error::AppResult;

/// Body of `POST /pre-approvals`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreApprovalRequest {
    pub visitor_name: String,
    pub contact_number: Option<String>,
    pub purpose: Option<String>,
    pub valid_until: Option<DateTime<Utc>>,
}

pub async fn create(
    ctx: &DataContext,
    resident_id: &str,
    society_id: &str,
    input: PreApprovalRequest,
) -> AppResult<PreApproval> {
    if input.visitor_name.trim().is_empty() {
        return Err(CoreError::Validation("Visitor name is required".into()).into());
    }
    if input.valid_until.is_some_and(|until| until < Utc::now()) {
        return Err(CoreError::Validation("Valid-until must be in the future".into()).into());
    }
    let pass = ctx
        .add_pre_approval(&CreatePreApproval {
            society_id: society_id.to_string(),
            resident_id: resident_id.to_string(),
            visitor_name: input.visitor_name.trim().to_string(),
            contact_number: input.contact_number,
            purpose: input.purpose,
            valid_until: input.valid_until,
        })
        .await?;
    tracing::info!(pre_approval_id = %pass.id, %resident_id, "Pre-approval created");
    Ok(pass)
}

/// A resident's passes, newest first, with lapsed passes reported expired.
pub async fn for_resident(ctx: &DataContext, resident_id: &str) -> Vec<PreApproval> {
    observed(ctx.pre_approvals_by_resident(resident_id).await)
}

/// Passes of a society as seen from the gate.
pub async fn for_society(ctx: &DataContext, society_id: &str) -> Vec<PreApproval> {
    observed(ctx.pre_approvals_by_society(society_id).await)
}

/// Withdraw a still-valid pass. It is stored as `expired`.
pub async fn cancel(ctx: &DataContext, resident_id: &str, id: &str) -> AppResult<PreApproval> {
    let _guard = ctx.lock_pre_approvals().await;
    let pass = ctx
        .get_pre_approval_by_id(id)
        .await
        .filter(|p| p.resident_id == resident_id)
        .ok_or_else(|| CoreError::not_found("PreApproval", id))?;
    if pass.status != PreApprovalStatus::Valid {
        return Err(CoreError::Conflict(format!(
            "Pre-approval is already {}",
            pass.status.name()
        ))
        .into());
    }
    let pass = ctx
        .update_pre_approval(
            id,
            &UpdatePreApproval {
                status: Some(PreApprovalStatus::Expired),
                used_at: None,
            },
        )
        .await?;
    Ok(pass)
}

/// Mark a pass used at the gate of `society_id`.
pub async fn mark_used(ctx: &DataContext, society_id: &str, id: &str) -> AppResult<PreApproval> {
    let _guard = ctx.lock_pre_approvals().await;
    let pass = ctx
        .get_pre_approval_by_id(id)
        .await
        .filter(|p| p.society_id == society_id)
        .ok_or_else(|| CoreError::not_found("PreApproval", id))?;
    let now = Utc::now();
    validate_redeemable(pass.status, pass.valid_until, now)?;
    let pass = ctx
        .update_pre_approval(
            id,
            &UpdatePreApproval {
                status: Some(PreApprovalStatus::Used),
                used_at: Some(now),
            },
        )
        .await?;
    tracing::info!(pre_approval_id = %id, "Pre-approval used");
    Ok(pass)
}

fn observed(mut passes: Vec<PreApproval>) -> Vec<PreApproval> {
    let now = Utc::now();
    for pass in &mut passes {
        pass.status = effective_status(pass.status, pass.valid_until, now);
    }
    passes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    passes
}
