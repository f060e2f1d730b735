//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde_json::Value;

use super::DomainError;
use crate::models::EntityKind;

/// Entity-agnostic access to one soft-deletable table.
///
/// Each kind gets exactly one implementation, looked up through the
/// registry, so controllers never need per-entity duplication.
#[async_trait]
pub trait SoftDeleteRepository: Send + Sync {
    /// Kind of entity this repository serves
    fn kind(&self) -> EntityKind;

    /// Find a row by ID, serialized as JSON.
    /// Soft-deleted rows are hidden unless `include_deleted` is set.
    async fn find(&self, id: i32, include_deleted: bool) -> Result<Option<Value>, DomainError>;

    /// True when the row exists and is not soft-deleted
    async fn is_live(&self, id: i32) -> Result<bool, DomainError>;

    /// Mark a live row as deleted. Returns the number of rows marked
    /// (0 when the row is missing or already deleted).
    async fn soft_delete(&self, id: i32) -> Result<u64, DomainError>;

    /// Clear the soft-delete marker. Returns the number of rows restored
    /// (0 when the row is missing or was never deleted).
    async fn restore(&self, id: i32) -> Result<u64, DomainError>;
}
