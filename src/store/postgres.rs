//! PostgreSQL backend over a sqlx pool.

use super::{Store, StoreError};
use crate::model::{FieldValue, Row, TableInfo};
use crate::sql::{self, bind_cell, decode_row, parse_order};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn count(&self, table: &TableInfo) -> Result<i64, StoreError> {
        let q = sql::count(table);
        tracing::debug!(sql = %q, "query");
        let n: i64 = sqlx::query_scalar(&q).fetch_one(&self.pool).await?;
        Ok(n)
    }

    async fn select_page(
        &self,
        table: &TableInfo,
        limit: i64,
        offset: Option<i64>,
        order: Option<&str>,
    ) -> Result<Vec<Row>, StoreError> {
        let terms = match order {
            Some(clause) => parse_order(clause).map_err(StoreError::InvalidOrder)?,
            None => Vec::new(),
        };
        let q = sql::select_page(table, limit, offset, &terms);
        tracing::debug!(sql = %q, "query");
        let rows = sqlx::query(&q).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|r| decode_row(r, table).map_err(StoreError::from))
            .collect()
    }

    async fn select_one(&self, table: &TableInfo, key: &FieldValue) -> Result<Option<Row>, StoreError> {
        let q = sql::select_by_key(table);
        tracing::debug!(sql = %q, key = %key, "query");
        let query = bind_cell(sqlx::query(&q), key, table.key_column().storage);
        let row = query.fetch_optional(&self.pool).await?;
        Ok(row.map(|r| decode_row(&r, table)).transpose()?)
    }

    async fn insert(&self, table: &TableInfo, row: &Row) -> Result<u64, StoreError> {
        let q = sql::insert(table);
        tracing::debug!(sql = %q, "execute");
        let mut query = sqlx::query(&q);
        for (cell, col) in row.iter().zip(table.columns) {
            query = bind_cell(query, cell, col.storage);
        }
        Ok(query.execute(&self.pool).await?.rows_affected())
    }

    async fn update(&self, table: &TableInfo, row: &Row) -> Result<u64, StoreError> {
        let q = sql::update(table);
        tracing::debug!(sql = %q, "execute");
        let mut query = sqlx::query(&q);
        for (cell, col) in row.iter().zip(table.columns) {
            if !col.primary_key {
                query = bind_cell(query, cell, col.storage);
            }
        }
        let key_col = table.key_column();
        let key = row.get(table.key).unwrap_or(&FieldValue::Null);
        query = bind_cell(query, key, key_col.storage);
        Ok(query.execute(&self.pool).await?.rows_affected())
    }

    async fn delete(&self, table: &TableInfo, key: &FieldValue) -> Result<u64, StoreError> {
        let q = sql::delete(table);
        tracing::debug!(sql = %q, key = %key, "execute");
        let query = bind_cell(sqlx::query(&q), key, table.key_column().storage);
        Ok(query.execute(&self.pool).await?.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
