//! Storage abstractions for foodmap services.
//!
//! Provides the [`StakeholderStore`] persistence boundary used by the bulk
//! importer, with two implementations:
//! - PostgreSQL catalog for deployments
//! - In-memory store for development and tests

pub mod catalog;
pub mod memory;
pub mod store;

pub use catalog::StakeholderCatalog;
pub use memory::MemoryStakeholderStore;
pub use store::{StakeholderRecord, StakeholderStore, StorageError, StorageResult};
