//! HTTP handlers for entity CRUD and schema discovery.

pub mod ddl;
pub mod entity;
pub use ddl::{get_ddl, list_ddl, DDL_TABLE};
