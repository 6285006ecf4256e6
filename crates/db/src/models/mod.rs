//! Record models and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize + Deserialize` record struct matching the stored document
//! - A create DTO carrying the caller-supplied fields
//! - An update DTO (all `Option` fields) serialized as a partial patch
//!
//! Field names are camelCase on the wire and in storage.

pub mod notice;
pub mod pre_approval;
pub mod society;
pub mod user;
pub mod visitor;
