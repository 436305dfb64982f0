//! Bind cells to sqlx queries and decode PostgreSQL rows back into cells.

use crate::model::{FieldValue, Row, StorageType, TableInfo};
use sqlx::postgres::{PgArguments, PgRow, Postgres};
use sqlx::query::Query;
use sqlx::Row as _;

pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Bind one cell. Nulls are typed from the column so PostgreSQL sees the right parameter type.
pub fn bind_cell<'q>(query: PgQuery<'q>, cell: &FieldValue, storage: StorageType) -> PgQuery<'q> {
    match cell {
        FieldValue::Int8(n) => query.bind(*n),
        FieldValue::Int4(n) => query.bind(*n),
        FieldValue::Bool(b) => query.bind(*b),
        FieldValue::Text(s) => query.bind(s.clone()),
        FieldValue::Timestamp(t) => query.bind(*t),
        FieldValue::Null => match storage {
            StorageType::Int8 => query.bind(None::<i64>),
            StorageType::Int4 => query.bind(None::<i32>),
            StorageType::Bool => query.bind(None::<bool>),
            StorageType::Varchar(_) => query.bind(None::<String>),
            StorageType::Timestamp => query.bind(None::<chrono::NaiveDateTime>),
        },
    }
}

fn decode_cell(row: &PgRow, index: usize, storage: StorageType) -> Result<FieldValue, sqlx::Error> {
    Ok(match storage {
        StorageType::Int8 => row.try_get::<Option<i64>, _>(index)?.into(),
        StorageType::Int4 => row.try_get::<Option<i32>, _>(index)?.into(),
        StorageType::Bool => row.try_get::<Option<bool>, _>(index)?.into(),
        StorageType::Varchar(_) => row.try_get::<Option<String>, _>(index)?.into(),
        StorageType::Timestamp => row.try_get::<Option<chrono::NaiveDateTime>, _>(index)?.into(),
    })
}

/// Decode a row selected with every column in ordinal order.
pub fn decode_row(row: &PgRow, table: &TableInfo) -> Result<Row, sqlx::Error> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| decode_cell(row, i, c.storage))
        .collect()
}
