//! In-process backend. Rows live in a map of tables; used by tests and local demos.

use super::{Store, StoreError};
use crate::model::{FieldValue, Row, TableInfo};
use crate::sql::parse_order;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<&'static str, Vec<Row>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently held for a table, in insertion order.
    pub fn rows(&self, table: &TableInfo) -> Vec<Row> {
        self.tables
            .read()
            .map(|t| t.get(table.name).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn with_rows<R>(
        &self,
        table: &TableInfo,
        f: impl FnOnce(&mut Vec<Row>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        f(tables.entry(table.name).or_default())
    }
}

fn key_matches(table: &TableInfo, row: &Row, key: &FieldValue) -> bool {
    row.get(table.key)
        .map(|k| k.sort_cmp(key) == Ordering::Equal && !k.is_null())
        .unwrap_or(false)
}

/// Resolve an order clause to (column ordinal, descending) pairs.
fn sort_keys(table: &TableInfo, order: Option<&str>) -> Result<Vec<(usize, bool)>, StoreError> {
    let Some(clause) = order else {
        return Ok(vec![(table.key, false)]);
    };
    parse_order(clause)
        .map_err(StoreError::InvalidOrder)?
        .into_iter()
        .map(|term| {
            let col = table
                .column(&term.column)
                .ok_or_else(|| StoreError::UnknownColumn {
                    table: table.name.to_string(),
                    column: term.column.clone(),
                })?;
            Ok((col.ordinal, term.descending))
        })
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn count(&self, table: &TableInfo) -> Result<i64, StoreError> {
        self.with_rows(table, |rows| Ok(rows.len() as i64))
    }

    async fn select_page(
        &self,
        table: &TableInfo,
        limit: i64,
        offset: Option<i64>,
        order: Option<&str>,
    ) -> Result<Vec<Row>, StoreError> {
        let keys = sort_keys(table, order)?;
        let mut rows = self.with_rows(table, |rows| Ok(rows.clone()))?;
        rows.sort_by(|a, b| {
            for &(i, desc) in &keys {
                let ord = match (a.get(i), b.get(i)) {
                    (Some(x), Some(y)) => x.sort_cmp(y),
                    _ => Ordering::Equal,
                };
                let ord = if desc { ord.reverse() } else { ord };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        let skip = offset.unwrap_or(0).max(0) as usize;
        let take = limit.max(0) as usize;
        Ok(rows.into_iter().skip(skip).take(take).collect())
    }

    async fn select_one(&self, table: &TableInfo, key: &FieldValue) -> Result<Option<Row>, StoreError> {
        self.with_rows(table, |rows| {
            Ok(rows.iter().find(|r| key_matches(table, r, key)).cloned())
        })
    }

    async fn insert(&self, table: &TableInfo, row: &Row) -> Result<u64, StoreError> {
        if row.len() != table.columns.len() {
            return Err(StoreError::Row(crate::model::RowError::MissingColumn(
                table.columns.get(row.len()).map(|c| c.name).unwrap_or(table.name),
            )));
        }
        let key = row.get(table.key).cloned().unwrap_or(FieldValue::Null);
        self.with_rows(table, |rows| {
            if rows.iter().any(|r| key_matches(table, r, &key)) {
                return Err(StoreError::DuplicateKey {
                    table: table.name.to_string(),
                    key: key.to_string(),
                });
            }
            rows.push(row.clone());
            Ok(1)
        })
    }

    async fn update(&self, table: &TableInfo, row: &Row) -> Result<u64, StoreError> {
        let key = row.get(table.key).cloned().unwrap_or(FieldValue::Null);
        self.with_rows(table, |rows| {
            match rows.iter_mut().find(|r| key_matches(table, r, &key)) {
                Some(existing) => {
                    *existing = row.clone();
                    Ok(1)
                }
                None => Ok(0),
            }
        })
    }

    async fn delete(&self, table: &TableInfo, key: &FieldValue) -> Result<u64, StoreError> {
        self.with_rows(table, |rows| {
            let before = rows.len();
            rows.retain(|r| !key_matches(table, r, key));
            Ok((before - rows.len()) as u64)
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.tables.read().map(|_| ()).map_err(|_| StoreError::Poisoned)
    }
}
