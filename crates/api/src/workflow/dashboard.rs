//! Counters shown on each role's landing screen.

use chrono::Utc;
use gatepass_core::pre_approval::{effective_status, PreApprovalStatus};
use gatepass_core::roles::{RoleKind, RoleStatus};
use gatepass_core::visitor::VisitTally;
use gatepass_db::models::visitor::Visitor;
use serde::Serialize;

use crate::context::DataContext;
use crate::workflow::membership::pending_society_requests;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityStats {
    pub today_entries: usize,
    pub pending: usize,
    pub inside: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentStats {
    pub pending: usize,
    pub inside: usize,
    pub today_entries: usize,
    pub valid_pre_approvals: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministratorStats {
    pub residents: usize,
    pub security: usize,
    pub pending_requests: usize,
    pub today_entries: usize,
    pub inside: usize,
    pub notices: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperadminStats {
    pub societies: usize,
    pub active_societies: usize,
    pub pending_administrators: usize,
}

fn tally(visits: &[Visitor]) -> VisitTally {
    VisitTally::from_visits(
        visits.iter().map(|v| (v.status, v.entry_time, v.exit_time)),
        Utc::now(),
    )
}

pub async fn security(ctx: &DataContext, society_id: &str) -> SecurityStats {
    let t = tally(&ctx.visitors_by_society(society_id).await);
    SecurityStats {
        today_entries: t.today,
        pending: t.pending,
        inside: t.inside,
    }
}

pub async fn resident(ctx: &DataContext, resident_id: &str) -> ResidentStats {
    let t = tally(&ctx.visitors_by_resident(resident_id).await);
    let now = Utc::now();
    let valid_pre_approvals = ctx
        .pre_approvals_by_resident(resident_id)
        .await
        .iter()
        .filter(|p| effective_status(p.status, p.valid_until, now) == PreApprovalStatus::Valid)
        .count();
    ResidentStats {
        pending: t.pending,
        inside: t.inside,
        today_entries: t.today,
        valid_pre_approvals,
    }
}

pub async fn administrator(ctx: &DataContext, society_id: &str) -> AdministratorStats {
    let residents = ctx
        .residents_by_society(society_id)
        .await
        .iter()
        .filter(|u| u.has_approved_role(RoleKind::Resident, Some(society_id)))
        .count();
    let security = ctx
        .security_by_society(society_id)
        .await
        .iter()
        .filter(|u| u.has_approved_role(RoleKind::Security, Some(society_id)))
        .count();
    let pending_requests = pending_society_requests(ctx, society_id).await.len();
    let t = tally(&ctx.visitors_by_society(society_id).await);

    AdministratorStats {
        residents,
        security,
        pending_requests,
        today_entries: t.today,
        inside: t.inside,
        notices: ctx.notices_by_society(society_id).await.len(),
    }
}

pub async fn superadmin(ctx: &DataContext) -> SuperadminStats {
    let now = Utc::now();
    let societies = ctx.societies().await;
    let pending_administrators = ctx
        .pending_administrators()
        .await
        .iter()
        .flat_map(|u| &u.roles)
        .filter(|r| r.role == RoleKind::Administrator && r.status == RoleStatus::Pending)
        .count();
    SuperadminStats {
        societies: societies.len(),
        active_societies: societies.iter().filter(|s| s.is_active_at(now)).count(),
        pending_administrators,
    }
}
