//! Builds parameterized SELECT, INSERT, UPDATE, DELETE and DDL from table descriptors.

use super::order::OrderTerm;
use crate::model::{StorageType, TableInfo};

/// Quote identifier for PostgreSQL (safe: names come from descriptors or a checked order clause).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// All columns in ordinal order, so decoded cells line up with descriptors.
fn select_column_list(table: &TableInfo) -> String {
    table
        .columns
        .iter()
        .map(|c| quoted(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn count(table: &TableInfo) -> String {
    format!("SELECT COUNT(*) FROM {}", quoted(table.name))
}

/// Bounded SELECT. Without an order clause rows come back in key order.
pub fn select_page(table: &TableInfo, limit: i64, offset: Option<i64>, order: &[OrderTerm]) -> String {
    let order_clause = if order.is_empty() {
        quoted(table.key_column().name)
    } else {
        order
            .iter()
            .map(|t| {
                if t.descending {
                    format!("{} DESC", quoted(&t.column))
                } else {
                    format!("{} ASC", quoted(&t.column))
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    };
    let offset_clause = offset.map(|n| format!(" OFFSET {}", n)).unwrap_or_default();
    format!(
        "SELECT {} FROM {} ORDER BY {} LIMIT {}{}",
        select_column_list(table),
        quoted(table.name),
        order_clause,
        limit,
        offset_clause
    )
}

/// SELECT by primary key. Caller binds the key as `$1`.
pub fn select_by_key(table: &TableInfo) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1",
        select_column_list(table),
        quoted(table.name),
        quoted(table.key_column().name)
    )
}

/// INSERT of every column, key included. Caller binds cells in ordinal order.
pub fn insert(table: &TableInfo) -> String {
    let placeholders: Vec<String> = (1..=table.columns.len()).map(|n| format!("${}", n)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(table.name),
        select_column_list(table),
        placeholders.join(", ")
    )
}

/// UPDATE every non-key column by key. Caller binds non-key cells in ordinal order, then the key.
pub fn update(table: &TableInfo) -> String {
    let mut sets = Vec::new();
    for c in table.columns.iter().filter(|c| !c.primary_key) {
        sets.push(format!("{} = ${}", quoted(c.name), sets.len() + 1));
    }
    format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        quoted(table.name),
        sets.join(", "),
        quoted(table.key_column().name),
        sets.len() + 1
    )
}

/// DELETE by key as `$1`.
pub fn delete(table: &TableInfo) -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1",
        quoted(table.name),
        quoted(table.key_column().name)
    )
}

fn ddl_type(storage: StorageType) -> String {
    match storage {
        StorageType::Int8 => "BIGINT".into(),
        StorageType::Int4 => "INTEGER".into(),
        StorageType::Bool => "BOOLEAN".into(),
        StorageType::Varchar(n) => format!("VARCHAR({})", n),
        StorageType::Timestamp => "TIMESTAMP".into(),
    }
}

/// CREATE TABLE IF NOT EXISTS from descriptors.
pub fn create_table(table: &TableInfo) -> String {
    let mut defs: Vec<String> = table
        .columns
        .iter()
        .map(|c| {
            let mut def = format!("{} {}", quoted(c.name), ddl_type(c.storage));
            if !c.nullable {
                def.push_str(" NOT NULL");
            }
            def
        })
        .collect();
    defs.push(format!("PRIMARY KEY ({})", quoted(table.key_column().name)));
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quoted(table.name),
        defs.join(", ")
    )
}
