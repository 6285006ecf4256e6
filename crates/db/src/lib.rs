//! Record storage for gatepass.
//!
//! - [`models`] -- typed records and DTOs for the five collections.
//! - [`providers`] -- the [`StorageProvider`] capability and its local,
//!   remote and in-memory variants.
//! - [`repositories`] -- typed CRUD over any provider.

pub mod collection;
pub mod document;
pub mod error;
pub mod models;
pub mod providers;
pub mod repositories;

pub use collection::Collection;
pub use document::Document;
pub use error::StorageError;
pub use providers::{connect, BackendKind, StorageConfig, StorageProvider};
