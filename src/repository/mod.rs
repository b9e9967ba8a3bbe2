use crate::models::{Entity, MalformedId, ObjectId, Product, Role};
use async_trait::async_trait;
use std::sync::Arc;

pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

/// RepositoryError
///
/// Failures a store can report. "Not found" is not an error at this layer: lookups
/// return `Option` and deletes return `bool`, leaving the interpretation to the service.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    InvalidIdentifier(#[from] MalformedId),
    /// A unique constraint in the store rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository Trait
///
/// The storage seam. Services only ever see `Arc<dyn Repository<T>>`, so a store technology
/// can be swapped (Postgres in deployments, `MemoryRepository` locally and in tests)
/// without touching services or handlers.
///
/// Every id-taking method validates the raw id first and fails with
/// `RepositoryError::InvalidIdentifier` before touching the store.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// All records in insertion order.
    async fn list_all(&self) -> RepositoryResult<Vec<T>>;

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Option<T>>;

    /// Persists a new record under a freshly generated `ObjectId`.
    async fn create(&self, input: T::Input) -> RepositoryResult<T>;

    /// Replaces every field of an existing record. `None` if the id is unknown.
    async fn update(&self, id: &str, input: T::Input) -> RepositoryResult<Option<T>>;

    /// `true` if a record was removed.
    async fn delete(&self, id: &str) -> RepositoryResult<bool>;
}

pub type ProductRepositoryState = Arc<dyn Repository<Product>>;
pub type RoleRepositoryState = Arc<dyn Repository<Role>>;

/// Shared id check used by every implementation.
pub(crate) fn parse_id(raw: &str) -> RepositoryResult<ObjectId> {
    Ok(ObjectId::parse(raw)?)
}
