//! Domain vocabulary shared by every gatepass crate.
//!
//! Nothing in here performs I/O: ids and timestamps, the domain error type,
//! role and status enums, and the pure rules of the visitor workflow.

pub mod error;
pub mod pre_approval;
pub mod roles;
pub mod society;
pub mod types;
pub mod validation;
pub mod visitor;
