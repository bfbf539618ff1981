//! Storage contract shared by every resource.
//!
//! Each entity repository extends [`CrudRepository`] with its own lookups.
//! Implementations live in `storage::memory` and in each module's
//! `repo::seaorm`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Create / read / update / delete over entity `E`, created from `C`,
/// patched with `U` and listed through filter `F`.
#[async_trait]
pub trait CrudRepository<E, C, U, F>: Send + Sync
where
    E: Send + 'static,
    C: Send + 'static,
    U: Send + 'static,
    F: Send + 'static,
{
    async fn create(&self, input: C) -> Result<E, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, ServiceError>;
    async fn find_all(&self, filter: F) -> Result<Vec<E>, ServiceError>;
    /// Apply only the fields present in `input`. Fails with `NotFound` when `id` is unknown.
    async fn update(&self, id: Uuid, input: U) -> Result<E, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}
