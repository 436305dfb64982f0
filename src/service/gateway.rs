//! Generic CRUD over one record type, translating storage failures into the fixed error taxonomy.

use super::PageRequest;
use crate::error::AppError;
use crate::model::{FieldValue, Record, Row, TableInfo};
use crate::store::Store;
use std::marker::PhantomData;
use std::sync::Arc;

pub struct Gateway<T> {
    store: Arc<dyn Store>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Gateway<T> {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Gateway {
            store,
            _record: PhantomData,
        }
    }

    /// One page plus the full table count. The two are separate queries with no shared snapshot.
    pub async fn list_page(&self, page: &PageRequest) -> Result<(Vec<T>, i64), AppError> {
        let table = T::table_info();
        let total = self.store.count(table).await.map_err(|e| {
            tracing::warn!(table = table.name, error = %e, "count failed");
            AppError::NotFound
        })?;
        let rows = self
            .store
            .select_page(table, page.limit(), page.offset(), page.order())
            .await
            .map_err(|e| {
                tracing::warn!(table = table.name, order = %page.order, error = %e, "page query failed");
                AppError::NotFound
            })?;
        let records = rows
            .into_iter()
            .map(T::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                tracing::warn!(table = table.name, error = %e, "row decode failed");
                AppError::NotFound
            })?;
        Ok((records, total))
    }

    pub async fn get_one(&self, key: &T::Key) -> Result<T, AppError> {
        let row = self.fetch(key).await?;
        T::from_row(row).map_err(|e| {
            tracing::warn!(table = T::table_name(), key = %key, error = %e, "row decode failed");
            AppError::NotFound
        })
    }

    /// Insert as given, caller-supplied key included.
    pub async fn create(&self, record: T) -> Result<(T, u64), AppError> {
        let table = T::table_info();
        let affected = self.store.insert(table, &record.to_row()).await.map_err(|e| {
            tracing::warn!(table = table.name, key = %record.key(), error = %e, "insert failed");
            AppError::InsertFailed
        })?;
        Ok((record, affected))
    }

    /// Fetch, merge the sent fields of `patch` over the stored row, save.
    pub async fn update(&self, key: &T::Key, patch: &T) -> Result<(T, u64), AppError> {
        let table = T::table_info();
        let stored = self.fetch(key).await?;
        let merged = merge_rows(table, stored, &patch.to_row());
        let record = T::from_row(merged).map_err(|e| {
            tracing::warn!(table = table.name, key = %key, error = %e, "merge failed");
            AppError::UpdateFailed
        })?;
        let affected = self.store.update(table, &record.to_row()).await.map_err(|e| {
            tracing::warn!(table = table.name, key = %key, error = %e, "update failed");
            AppError::UpdateFailed
        })?;
        Ok((record, affected))
    }

    pub async fn delete(&self, key: &T::Key) -> Result<u64, AppError> {
        let table = T::table_info();
        self.fetch(key).await?;
        let cell: FieldValue = key.clone().into();
        self.store.delete(table, &cell).await.map_err(|e| {
            tracing::warn!(table = table.name, key = %key, error = %e, "delete failed");
            AppError::DeleteFailed
        })
    }

    async fn fetch(&self, key: &T::Key) -> Result<Row, AppError> {
        let table = T::table_info();
        let cell: FieldValue = key.clone().into();
        match self.store.select_one(table, &cell).await {
            Ok(Some(row)) => Ok(row),
            Ok(None) => Err(AppError::NotFound),
            Err(e) => {
                tracing::warn!(table = table.name, key = %key, error = %e, "lookup failed");
                Err(AppError::NotFound)
            }
        }
    }
}

/// Shallow merge: copy each sent, non-key cell of `patch` onto `stored`.
///
/// A cell is sent when it is non-null for a nullable column, or non-zero for a required one.
/// A required field cannot be cleared this way: its zero value reads as "not sent".
pub fn merge_rows(table: &TableInfo, mut stored: Row, patch: &[FieldValue]) -> Row {
    for (col, sent) in table.columns.iter().zip(patch) {
        if col.primary_key || !sent.is_present(col.nullable) {
            continue;
        }
        if let Some(slot) = stored.get_mut(col.ordinal) {
            *slot = sent.clone();
        }
    }
    stored
}
