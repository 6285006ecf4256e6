//! Role workflows on top of [`DataContext`](crate::context::DataContext).
//!
//! Handlers stay thin: they extract the session and payload and call into
//! these functions, which apply the guards the raw context operations do not.

pub mod dashboard;
pub mod membership;
pub mod pre_approvals;
pub mod visits;
