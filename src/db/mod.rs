pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// One row as exchanged with the store: column name to JSON value.
pub type Row = Map<String, Value>;

/// Column predicate understood by every [`RowStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(&'static str, Value),
    Gte(&'static str, Value),
    Lt(&'static str, Value),
    In(&'static str, Vec<Value>),
}

impl Filter {
    pub fn equals<T: Serialize>(column: &'static str, value: T) -> Result<Self, StoreError> {
        Ok(Filter::Eq(column, to_json(column, value)?))
    }

    pub fn at_least<T: Serialize>(column: &'static str, value: T) -> Result<Self, StoreError> {
        Ok(Filter::Gte(column, to_json(column, value)?))
    }

    pub fn before<T: Serialize>(column: &'static str, value: T) -> Result<Self, StoreError> {
        Ok(Filter::Lt(column, to_json(column, value)?))
    }

    pub fn any_of<T: Serialize>(
        column: &'static str,
        values: impl IntoIterator<Item = T>,
    ) -> Result<Self, StoreError> {
        let values = values
            .into_iter()
            .map(|v| to_json(column, v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Filter::In(column, values))
    }

    pub fn column(&self) -> &'static str {
        match self {
            Filter::Eq(c, _) | Filter::Gte(c, _) | Filter::Lt(c, _) | Filter::In(c, _) => c,
        }
    }
}

fn to_json<T: Serialize>(column: &'static str, value: T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|source| StoreError::Encode { column, source })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

impl Order {
    pub const fn asc(column: &'static str) -> Self {
        Self { column, ascending: true }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self { column, ascending: false }
    }
}

/// The remote row-store surface consumed by the services.
///
/// Implementations fill store-side defaults (`id`, `created_at`) on insert
/// and report an unmatched id on `update`/`delete` as [`StoreError::NotFound`].
/// `delete_where` removes every matching row in one step, or none on failure.
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: &[Order],
    ) -> Result<Vec<Row>, StoreError>;

    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError>;

    async fn update(&self, table: &str, row: Row, id: Uuid) -> Result<(), StoreError>;

    async fn delete(&self, table: &str, id: Uuid) -> Result<(), StoreError>;

    /// Returns the number of rows removed.
    async fn delete_where(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError>;
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run the schema migrations embedded in ./migrations/
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
