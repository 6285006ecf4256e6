pub mod auth;
pub mod dashboard;
pub mod members;
pub mod notices;
pub mod pre_approvals;
pub mod societies;
pub mod visitors;
