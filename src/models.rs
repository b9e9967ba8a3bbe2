use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{
    fmt,
    sync::{
        OnceLock,
        atomic::{AtomicU32, Ordering},
    },
};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Identifiers ---

/// ObjectId
///
/// The store-native identifier shared by every collection: 24 lowercase hex characters
/// encoding a 4-byte timestamp, 5 process-random bytes and a 3-byte counter.
/// Identifiers are always generated server-side; clients only ever echo them back in paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ObjectId(String);

/// Error returned when a path segment is not a well-formed `ObjectId`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid identifier")]
pub struct MalformedId(pub String);

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

impl ObjectId {
    pub const LEN: usize = 24;

    /// generate
    ///
    /// Produces a fresh identifier. Identifiers generated by one process sort by creation
    /// second, and the counter keeps them unique within the same second.
    pub fn generate() -> Self {
        let process = PROCESS_UNIQUE.get_or_init(|| {
            let random = Uuid::new_v4();
            let mut bytes = [0u8; 5];
            bytes.copy_from_slice(&random.as_bytes()[..5]);
            bytes
        });
        let counter = COUNTER.get_or_init(|| {
            let seed = Uuid::new_v4().as_bytes()[..4]
                .iter()
                .fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
            AtomicU32::new(seed)
        });

        let timestamp = Utc::now().timestamp() as u32;
        let count = counter.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;

        let mut raw = [0u8; 12];
        raw[..4].copy_from_slice(&timestamp.to_be_bytes());
        raw[4..9].copy_from_slice(process);
        raw[9..].copy_from_slice(&count.to_be_bytes()[1..]);

        Self(raw.iter().map(|b| format!("{:02x}", b)).collect())
    }

    /// parse
    ///
    /// Accepts exactly 24 hex digits in either case and normalizes to lowercase.
    pub fn parse(raw: &str) -> Result<Self, MalformedId> {
        if raw.len() == Self::LEN && raw.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(MalformedId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Entity Contract ---

/// Entity
///
/// Ties a stored record to the input payload it is built from. Repositories are generic
/// over this trait so every collection exposes the same capability set.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The write payload accepted by `create` and `update`.
    type Input: Clone + Send + Sync + 'static;

    /// Human readable collection name used in error messages and logs.
    const KIND: &'static str;

    fn id(&self) -> &ObjectId;

    /// Builds the stored record from a generated (or existing) id and the input fields.
    fn assemble(id: ObjectId, input: Self::Input) -> Self;

    /// Value that must be unique across the collection, if the entity has one.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

// --- Products ---

/// Product
///
/// A catalogue item as stored in the `products` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(value_type = String, example = "62f7a9b3c4d1e01234567890")]
    pub id: ObjectId,
    #[schema(example = "Brand Sony Wireless Headphones")]
    pub name: String,
    #[schema(example = "Bluetooth headphones with noise cancellation and 20-hour battery life.")]
    pub description: String,
    #[schema(example = 59.99)]
    pub price: f64,
    #[schema(example = 150)]
    pub stock: i32,
    #[schema(example = "Electronic")]
    pub category: String,
    #[schema(example = "https://example.com/images/product-headphones.jpg")]
    pub image_url: String,
}

/// ProductInput
///
/// Payload for creating (POST /products) and replacing (PUT /products/{id}) a product.
/// Shape rules are checked by `ValidatedJson` before the request reaches the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(length(min = 1, max = 200, message = "name must be between 1 and 200 characters"))]
    #[schema(example = "Brand Sony Wireless Headphones")]
    pub name: String,
    #[validate(length(max = 2000, message = "description must not exceed 2000 characters"))]
    #[schema(example = "Bluetooth headphones with noise cancellation and 20-hour battery life.")]
    pub description: String,
    #[validate(range(min = 0.0, message = "price must be a non-negative number"))]
    #[schema(example = 59.99, minimum = 0)]
    pub price: f64,
    #[validate(range(min = 0, message = "stock must be a non-negative integer"))]
    #[schema(example = 150, minimum = 0)]
    pub stock: i32,
    #[validate(length(min = 1, max = 100, message = "category must be between 1 and 100 characters"))]
    #[schema(example = "Electronic")]
    pub category: String,
    #[schema(example = "https://example.com/images/product-headphones.jpg")]
    pub image_url: String,
}

impl Entity for Product {
    type Input = ProductInput;
    const KIND: &'static str = "Product";

    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn assemble(id: ObjectId, input: ProductInput) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            category: input.category,
            image_url: input.image_url,
        }
    }
}

// --- Roles ---

/// Role
///
/// A named role from the `roles` collection. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Role {
    #[schema(value_type = String, example = "674a3f21c91b9e7d45f0b812")]
    pub id: ObjectId,
    #[schema(example = "admin")]
    pub name: String,
}

/// RoleInput
///
/// Payload for POST /roles and PUT /roles/{id}.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct RoleInput {
    #[validate(length(min = 1, max = 64, message = "name must be between 1 and 64 characters"))]
    #[schema(example = "customer")]
    pub name: String,
}

impl Entity for Role {
    type Input = RoleInput;
    const KIND: &'static str = "Role";

    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn assemble(id: ObjectId, input: RoleInput) -> Self {
        Self {
            id,
            name: input.name,
        }
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.name)
    }
}
