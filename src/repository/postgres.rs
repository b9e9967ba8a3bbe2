use super::{Repository, RepositoryError, RepositoryResult, parse_id};
use crate::models::{ObjectId, Product, ProductInput, Role, RoleInput};
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgresRepository
///
/// The durable implementation of `Repository`, backed by one table per collection
/// (`products`, `roles`; see `migrations/`). Rows carry a `seq BIGSERIAL` column so
/// listings come back in insertion order. Every statement is a single-row operation,
/// so no explicit transactions are needed.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps unique violations to `Conflict` and keeps everything else as a database error.
fn map_write_error(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(what.to_string());
        }
    }
    RepositoryError::Database(err)
}

#[async_trait]
impl Repository<Product> for PostgresRepository {
    async fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"SELECT id, name, description, price, stock, category, image_url
               FROM products
               ORDER BY seq ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Option<Product>> {
        let id = parse_id(id)?;
        let product = sqlx::query_as::<_, Product>(
            r#"SELECT id, name, description, price, stock, category, image_url
               FROM products
               WHERE id = $1"#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn create(&self, input: ProductInput) -> RepositoryResult<Product> {
        let id = ObjectId::generate();
        let product = sqlx::query_as::<_, Product>(
            r#"INSERT INTO products (id, name, description, price, stock, category, image_url)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id, name, description, price, stock, category, image_url"#,
        )
        .bind(id.as_str())
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(&input.category)
        .bind(&input.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "product id collision"))?;
        Ok(product)
    }

    async fn update(&self, id: &str, input: ProductInput) -> RepositoryResult<Option<Product>> {
        let id = parse_id(id)?;
        let product = sqlx::query_as::<_, Product>(
            r#"UPDATE products
               SET name = $2, description = $3, price = $4, stock = $5,
                   category = $6, image_url = $7, updated_at = NOW()
               WHERE id = $1
               RETURNING id, name, description, price, stock, category, image_url"#,
        )
        .bind(id.as_str())
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(&input.category)
        .bind(&input.image_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let id = parse_id(id)?;
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository<Role> for PostgresRepository {
    async fn list_all(&self) -> RepositoryResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY seq ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Option<Role>> {
        let id = parse_id(id)?;
        let role = sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    async fn create(&self, input: RoleInput) -> RepositoryResult<Role> {
        let id = ObjectId::generate();
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(id.as_str())
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Role with this name already exists"))?;
        Ok(role)
    }

    async fn update(&self, id: &str, input: RoleInput) -> RepositoryResult<Option<Role>> {
        let id = parse_id(id)?;
        let role = sqlx::query_as::<_, Role>(
            r#"UPDATE roles SET name = $2, updated_at = NOW()
               WHERE id = $1
               RETURNING id, name"#,
        )
        .bind(id.as_str())
        .bind(&input.name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Role with this name already exists"))?;
        Ok(role)
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let id = parse_id(id)?;
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
