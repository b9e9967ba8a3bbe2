use crate::{
    models::{Entity, Product, ProductInput, Role, RoleInput},
    repository::{ProductRepositoryState, RepositoryError, RoleRepositoryState},
};
use tracing::instrument;

/// ServiceError
///
/// Domain-level outcomes the handlers translate into status codes.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidIdentifier(String),
    #[error("{kind} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("{0}")]
    Conflict(String),
    /// Store or infrastructure failure. Never shown to clients verbatim.
    #[error("repository failure: {0}")]
    Repository(#[source] RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::InvalidIdentifier(e) => ServiceError::InvalidIdentifier(e.to_string()),
            RepositoryError::Conflict(message) => ServiceError::Conflict(message),
            other => ServiceError::Repository(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn not_found<T: Entity>(id: &str) -> ServiceError {
    ServiceError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}

/// ProductService
///
/// Pass-through orchestration over the product repository. Input shape rules are
/// enforced at the HTTP boundary before calls reach here.
#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepositoryState,
}

impl ProductService {
    pub fn new(repo: ProductRepositoryState) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.repo.list_all().await?)
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Product> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found::<Product>(id))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ProductInput) -> ServiceResult<Product> {
        let product = self.repo.create(input).await?;
        tracing::info!(id = %product.id, "product created");
        Ok(product)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: ProductInput) -> ServiceResult<Product> {
        let product = self
            .repo
            .update(id, input)
            .await?
            .ok_or_else(|| not_found::<Product>(id))?;
        tracing::info!("product updated");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        if self.repo.delete(id).await? {
            tracing::info!("product deleted");
            Ok(())
        } else {
            Err(not_found::<Product>(id))
        }
    }
}

/// RoleService
///
/// Role orchestration. A name may belong to at most one role; every store enforces
/// that atomically on write and reports a clash as `Conflict`.
#[derive(Clone)]
pub struct RoleService {
    repo: RoleRepositoryState,
}

fn log_conflict(err: &RepositoryError) {
    if let RepositoryError::Conflict(_) = err {
        tracing::warn!("rejected duplicate role name");
    }
}

impl RoleService {
    pub fn new(repo: RoleRepositoryState) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Role>> {
        Ok(self.repo.list_all().await?)
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Role> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found::<Role>(id))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: RoleInput) -> ServiceResult<Role> {
        let role = self.repo.create(input).await.inspect_err(log_conflict)?;
        tracing::info!(id = %role.id, "role created");
        Ok(role)
    }

    /// Id errors (400/404) take precedence over a name clash (409): stores resolve the
    /// target before checking the name.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn update(&self, id: &str, input: RoleInput) -> ServiceResult<Role> {
        let role = self
            .repo
            .update(id, input)
            .await
            .inspect_err(log_conflict)?
            .ok_or_else(|| not_found::<Role>(id))?;
        tracing::info!("role updated");
        Ok(role)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        if self.repo.delete(id).await? {
            tracing::info!("role deleted");
            Ok(())
        } else {
            Err(not_found::<Role>(id))
        }
    }
}
