//! Gate entries, resident decisions and exit close-out.

use chrono::Utc;
use gatepass_camera::photo::{PhotoDataUri, DEFAULT_MAX_PHOTO_BYTES};
use gatepass_core::error::CoreError;
use gatepass_core::pre_approval::{validate_redeemable, PreApprovalStatus};
use gatepass_core::roles::RoleKind;
use gatepass_core::validation::{validate_input, VisitorEntry};
use gatepass_core::visitor::{validate_close, validate_decision, VisitDecision, VisitFilter};
use gatepass_db::models::pre_approval::UpdatePreApproval;
use gatepass_db::models::visitor::{CreateVisitor, UpdateVisitor, Visitor};

use crate::context::DataContext;
use crate::error::AppResult;

/// Record a visitor arriving at the gate of `society_id`.
///
/// The visit starts `pending` with `entryTime = now` and no exit. When the
/// entry redeems a pre-approval, the pass is claimed before the visit is
/// written and released again if that write fails.
pub async fn record_entry(
    ctx: &DataContext,
    guard_id: &str,
    society_id: &str,
    entry: VisitorEntry,
) -> AppResult<Visitor> {
    validate_input(&entry)?;

    let photo = entry.photo.filter(|p| !p.trim().is_empty());
    if let Some(uri) = &photo {
        PhotoDataUri::parse(uri, DEFAULT_MAX_PHOTO_BYTES)
            .map_err(|e| CoreError::Validation(e.to_string()))?;
    }

    if !ctx.is_society_active(society_id).await {
        return Err(CoreError::Forbidden(
            "Society access has expired. Contact the platform administrator.".into(),
        )
        .into());
    }

    let resident_ok = ctx
        .residents_by_society(society_id)
        .await
        .iter()
        .any(|u| {
            u.id == entry.resident_id
                && u.has_approved_role(RoleKind::Resident, Some(society_id))
        });
    if !resident_ok {
        return Err(CoreError::Validation(
            "Selected resident is not an approved resident of this society".into(),
        )
        .into());
    }

    let _pass_guard = match &entry.pre_approval_id {
        Some(_) => Some(ctx.lock_pre_approvals().await),
        None => None,
    };
    if let Some(pass_id) = &entry.pre_approval_id {
        claim_pre_approval(ctx, society_id, &entry.resident_id, pass_id).await?;
    }

    let input = CreateVisitor {
        name: entry.name.trim().to_string(),
        gender: entry.gender,
        id_proof: entry.id_proof,
        coming_from: entry.coming_from,
        purpose: entry.purpose,
        contact_number: entry.contact_number.filter(|c| !c.trim().is_empty()),
        resident_id: entry.resident_id,
        society_id: society_id.to_string(),
        photo,
        created_by: Some(guard_id.to_string()),
        pre_approval_id: entry.pre_approval_id.clone(),
    };
    let visitor = match ctx.add_visitor(&input).await {
        Ok(visitor) => visitor,
        Err(e) => {
            if let Some(pass_id) = &entry.pre_approval_id {
                if let Err(release) = ctx.release_pre_approval(pass_id).await {
                    tracing::error!(
                        pre_approval_id = %pass_id,
                        error = %release,
                        "Failed to release pre-approval after entry failed"
                    );
                }
            }
            return Err(e.into());
        }
    };

    if let Some(pass_id) = &entry.pre_approval_id {
        tracing::info!(
            visitor_id = %visitor.id,
            pre_approval_id = %pass_id,
            "Pre-approval redeemed"
        );
    }

    Ok(visitor)
}

/// Check a pass against the entry and move it to `used`.
///
/// Callers hold [`DataContext::lock_pre_approvals`].
async fn claim_pre_approval(
    ctx: &DataContext,
    society_id: &str,
    resident_id: &str,
    pass_id: &str,
) -> AppResult<()> {
    let pass = ctx
        .get_pre_approval_by_id(pass_id)
        .await
        .filter(|p| p.society_id == society_id)
        .ok_or_else(|| CoreError::not_found("PreApproval", pass_id))?;
    if pass.resident_id != resident_id {
        return Err(
            CoreError::Validation("Pre-approval was issued by a different resident".into()).into(),
        );
    }
    let now = Utc::now();
    validate_redeemable(pass.status, pass.valid_until, now)?;
    ctx.update_pre_approval(
        pass_id,
        &UpdatePreApproval {
            status: Some(PreApprovalStatus::Used),
            used_at: Some(now),
        },
    )
    .await?;
    Ok(())
}

/// Visits of a society matching `filter`, newest entry first.
pub async fn society_visits(
    ctx: &DataContext,
    society_id: &str,
    filter: VisitFilter,
) -> Vec<Visitor> {
    let visits = ctx
        .visitors_by_society(society_id)
        .await
        .into_iter()
        .filter(|v| filter.matches(v.status, v.exit_time))
        .collect();
    newest_first(visits)
}

/// A resident's own visitors, newest entry first.
pub async fn resident_visits(ctx: &DataContext, resident_id: &str) -> Vec<Visitor> {
    newest_first(ctx.visitors_by_resident(resident_id).await)
}

/// Record the exit of an approved visitor who is still inside.
pub async fn close_visit(
    ctx: &DataContext,
    society_id: &str,
    visit_id: &str,
) -> AppResult<Visitor> {
    let visit = ctx
        .get_visitor_by_id(visit_id)
        .await
        .filter(|v| v.society_id == society_id)
        .ok_or_else(|| CoreError::not_found("Visitor", visit_id))?;

    validate_close(visit.status, visit.exit_time)?;

    let closed = ctx
        .update_visitor(
            visit_id,
            &UpdateVisitor {
                exit_time: Some(Utc::now()),
                ..Default::default()
            },
        )
        .await?;
    tracing::info!(visitor_id = %visit_id, "Visit closed");
    Ok(closed)
}

/// Apply a resident's decision to one of their own visits.
pub async fn decide_visit(
    ctx: &DataContext,
    resident_id: &str,
    visit_id: &str,
    decision: VisitDecision,
) -> AppResult<Visitor> {
    let visit = ctx
        .get_visitor_by_id(visit_id)
        .await
        .ok_or_else(|| CoreError::not_found("Visitor", visit_id))?;
    if visit.resident_id != resident_id {
        return Err(CoreError::Forbidden("You can only respond to your own visitors".into()).into());
    }

    validate_decision(visit.status, decision)?;

    let status = decision.resulting_status();
    let updated = ctx
        .update_visitor(
            visit_id,
            &UpdateVisitor {
                status: Some(status),
                ..Default::default()
            },
        )
        .await?;
    tracing::info!(visitor_id = %visit_id, status = status.name(), "Visit decided");
    Ok(updated)
}

fn newest_first(mut visits: Vec<Visitor>) -> Vec<Visitor> {
    visits.sort_by(|a, b| b.entry_time.cmp(&a.entry_time));
    visits
}
