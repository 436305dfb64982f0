//! Storage backends. A `Store` moves rows in and out of tables; it knows nothing about typed records.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::model::{FieldValue, Row, RowError, TableInfo};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("invalid order clause term: '{0}'")]
    InvalidOrder(String),
    #[error("unknown column {column} in {table}")]
    UnknownColumn { table: String, column: String },
    #[error("duplicate key {key} in {table}")]
    DuplicateKey { table: String, key: String },
    #[error("row shape: {0}")]
    Row(#[from] RowError),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Raw table access. Rows are in column ordinal order.
#[async_trait]
pub trait Store: Send + Sync {
    /// Rows in the whole table, independent of any page.
    async fn count(&self, table: &TableInfo) -> Result<i64, StoreError>;

    /// At most `limit` rows after skipping `offset`. `order` is applied verbatim as a sort clause;
    /// without it rows come back in key order.
    async fn select_page(
        &self,
        table: &TableInfo,
        limit: i64,
        offset: Option<i64>,
        order: Option<&str>,
    ) -> Result<Vec<Row>, StoreError>;

    async fn select_one(&self, table: &TableInfo, key: &FieldValue) -> Result<Option<Row>, StoreError>;

    /// Insert as given, key included. Returns rows affected.
    async fn insert(&self, table: &TableInfo, row: &Row) -> Result<u64, StoreError>;

    /// Overwrite every non-key column of the row with the same key. Returns rows affected.
    async fn update(&self, table: &TableInfo, row: &Row) -> Result<u64, StoreError>;

    async fn delete(&self, table: &TableInfo, key: &FieldValue) -> Result<u64, StoreError>;

    /// Cheap liveness check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;
}
