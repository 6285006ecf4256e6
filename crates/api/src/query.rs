//! Shared query parameter types for API handlers.

use gatepass_core::visitor::VisitFilter;
use serde::Deserialize;

/// `?filter=all|pending|approved|inside|exited` on visit listings.
#[derive(Debug, Default, Deserialize)]
pub struct VisitFilterParams {
    #[serde(default)]
    pub filter: VisitFilter,
}
