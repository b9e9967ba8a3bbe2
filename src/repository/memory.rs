use super::{Repository, RepositoryError, RepositoryResult, parse_id};
use crate::models::{Entity, ObjectId};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// MemoryRepository
///
/// A process-local collection kept in insertion order behind a tokio `RwLock`.
/// Reads run concurrently, writes are serialized. Used when no `DATABASE_URL` is
/// configured in local mode, and as the in-memory fake for handler and service tests.
///
/// Entities with a `unique_key` are checked against the collection while the write
/// lock is held, mirroring the unique index of the Postgres store.
pub struct MemoryRepository<T: Entity> {
    records: RwLock<Vec<T>>,
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Starts the collection with existing records (test fixtures, seed data).
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

/// `Conflict` if `candidate` shares its unique key with any record other than `skip`.
fn check_unique<T: Entity>(records: &[T], candidate: &T, skip: Option<usize>) -> RepositoryResult<()> {
    let Some(key) = candidate.unique_key() else {
        return Ok(());
    };
    let clash = records
        .iter()
        .enumerate()
        .any(|(i, r)| Some(i) != skip && r.unique_key() == Some(key));
    if clash {
        return Err(RepositoryError::Conflict(format!(
            "{} with this name already exists",
            T::KIND
        )));
    }
    Ok(())
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn list_all(&self) -> RepositoryResult<Vec<T>> {
        Ok(self.records.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Option<T>> {
        let id = parse_id(id)?;
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == &id).cloned())
    }

    async fn create(&self, input: T::Input) -> RepositoryResult<T> {
        let record = T::assemble(ObjectId::generate(), input);
        let mut records = self.records.write().await;
        check_unique(&records, &record, None)?;
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, input: T::Input) -> RepositoryResult<Option<T>> {
        let id = parse_id(id)?;
        let mut records = self.records.write().await;
        let Some(pos) = records.iter().position(|r| r.id() == &id) else {
            return Ok(None);
        };
        let record = T::assemble(id, input);
        check_unique(&records, &record, Some(pos))?;
        // Replace in place so the record keeps its position in the listing.
        records[pos] = record.clone();
        Ok(Some(record))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let id = parse_id(id)?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != &id);
        Ok(records.len() < before)
    }
}
