//! Record model: static table descriptors, the per-entity `Record` contract, and the seven tables.

#[macro_use]
mod macros;

pub mod timestamp;
pub mod value;

mod label_type;
mod t_image;
mod t_image_set;
mod t_label;
mod t_project;
mod t_project_user;
mod t_user;

pub use label_type::LabelType;
pub use t_image::TImage;
pub use t_image_set::TImageSet;
pub use t_label::TLabel;
pub use t_project::TProject;
pub use t_project_user::TProjectUser;
pub use t_user::TUser;
pub use value::{take_cell, FieldValue, FromField, Row, RowError};

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// What a request intends to do with a table. The validation hook is authorized against this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Update,
    Delete,
    RetrieveOne,
    RetrieveMany,
    FetchSchema,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::RetrieveOne => "retrieve_one",
            Action::RetrieveMany => "retrieve_many",
            Action::FetchSchema => "fetch_schema",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, Action::Create | Action::Update | Action::Delete)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column storage type in PostgreSQL terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageType {
    Int8,
    Int4,
    Bool,
    /// Bounded text; the bound is in characters.
    Varchar(u32),
    Timestamp,
}

impl StorageType {
    pub fn type_name(&self) -> &'static str {
        match self {
            StorageType::Int8 => "INT8",
            StorageType::Int4 => "INT4",
            StorageType::Bool => "BOOL",
            StorageType::Varchar(_) => "VARCHAR",
            StorageType::Timestamp => "TIMESTAMP",
        }
    }

    /// Type as written in DDL, e.g. `VARCHAR(255)`.
    pub fn pretty(&self) -> String {
        match self {
            StorageType::Varchar(n) => format!("VARCHAR({})", n),
            other => other.type_name().to_string(),
        }
    }

    pub fn length(&self) -> Option<u32> {
        match self {
            StorageType::Varchar(n) => Some(*n),
            _ => None,
        }
    }
}

/// Static metadata for one column. One set per table, shared by every instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub ordinal: usize,
    pub name: &'static str,
    pub storage: StorageType,
    pub nullable: bool,
    pub primary_key: bool,
}

impl ColumnDescriptor {
    pub const fn new(ordinal: usize, name: &'static str, storage: StorageType, nullable: bool) -> Self {
        ColumnDescriptor {
            ordinal,
            name,
            storage,
            nullable,
            primary_key: false,
        }
    }

    pub const fn key(ordinal: usize, name: &'static str, storage: StorageType) -> Self {
        ColumnDescriptor {
            ordinal,
            name,
            storage,
            nullable: false,
            primary_key: true,
        }
    }

    pub fn length(&self) -> Option<u32> {
        self.storage.length()
    }
}

impl Serialize for ColumnDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ColumnDescriptor", 11)?;
        s.serialize_field("index", &self.ordinal)?;
        s.serialize_field("name", self.name)?;
        s.serialize_field("nullable", &self.nullable)?;
        s.serialize_field("database_type_name", self.storage.type_name())?;
        s.serialize_field("database_type_pretty", &self.storage.pretty())?;
        s.serialize_field("column_length", &self.length().map(i64::from).unwrap_or(-1))?;
        s.serialize_field("is_primary_key", &self.primary_key)?;
        s.serialize_field("is_auto_increment", &false)?;
        s.serialize_field("is_array", &false)?;
        s.serialize_field("column_type", self.storage.type_name())?;
        s.serialize_field("json_field_name", self.name)?;
        s.end()
    }
}

/// Table name plus its ordered columns. `key` is the ordinal of the single primary-key column.
#[derive(Debug, Serialize)]
pub struct TableInfo {
    pub name: &'static str,
    #[serde(skip)]
    pub key: usize,
    pub columns: &'static [ColumnDescriptor],
}

impl TableInfo {
    pub fn key_column(&self) -> &ColumnDescriptor {
        &self.columns[self.key]
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Data-shape rejection from `before_save` or `validate`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Primary-key type: parsed from the path segment, stored as a cell.
pub trait RecordKey: Clone + std::fmt::Display + Into<FieldValue> + Send + Sync + 'static {
    /// Name of the key type in parse errors.
    const KIND: &'static str;

    fn parse_key(raw: &str) -> Result<Self, AppError>;
}

impl RecordKey for i64 {
    const KIND: &'static str = "int64";

    fn parse_key(raw: &str) -> Result<Self, AppError> {
        raw.trim().parse().map_err(|_| AppError::InvalidKey {
            kind: Self::KIND,
            value: raw.to_string(),
        })
    }
}

impl RecordKey for i32 {
    const KIND: &'static str = "int32";

    fn parse_key(raw: &str) -> Result<Self, AppError> {
        raw.trim().parse().map_err(|_| AppError::InvalidKey {
            kind: Self::KIND,
            value: raw.to_string(),
        })
    }
}

impl RecordKey for String {
    const KIND: &'static str = "string";

    fn parse_key(raw: &str) -> Result<Self, AppError> {
        if raw.is_empty() {
            return Err(AppError::InvalidKey {
                kind: Self::KIND,
                value: String::new(),
            });
        }
        Ok(raw.to_string())
    }
}

/// Conversion between a typed record and its row. Generated by `record!`.
pub trait RowCodec: Sized {
    type Key: RecordKey;

    fn table_info() -> &'static TableInfo;
    fn key(&self) -> Self::Key;
    fn to_row(&self) -> Row;
    fn from_row(row: Row) -> Result<Self, RowError>;
}

/// Per-entity contract the request pipeline and gateway are generic over.
pub trait Record:
    RowCodec + Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    /// URL segment the table is served under, e.g. `tuser`.
    const ROUTE: &'static str;

    fn table_name() -> &'static str {
        Self::table_info().name
    }

    fn column_descriptors() -> &'static [ColumnDescriptor] {
        Self::table_info().columns
    }

    /// Reject records that cannot be persisted at all.
    fn before_save(&mut self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Defaulting pass. Trims surrounding whitespace from text fields.
    fn prepare(&mut self) {
        let mut row = self.to_row();
        let mut changed = false;
        for cell in row.iter_mut() {
            if let FieldValue::Text(s) = cell {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    *s = trimmed.to_string();
                    changed = true;
                }
            }
        }
        if changed {
            match Self::from_row(row) {
                Ok(record) => *self = record,
                Err(e) => tracing::debug!(table = Self::table_name(), error = %e, "trim skipped"),
            }
        }
    }

    fn validate(&self, action: Action) -> Result<(), ValidationError> {
        validate_columns(Self::table_info(), &self.to_row(), action)
    }
}

/// Length bounds on every present text cell; non-empty required text on create.
pub fn validate_columns(info: &TableInfo, row: &[FieldValue], action: Action) -> Result<(), ValidationError> {
    if !matches!(action, Action::Create | Action::Update) {
        return Ok(());
    }
    for (col, cell) in info.columns.iter().zip(row) {
        let FieldValue::Text(s) = cell else { continue };
        if let Some(max) = col.length() {
            if s.chars().count() > max as usize {
                return Err(ValidationError(format!(
                    "{} must be at most {} characters",
                    col.name, max
                )));
            }
        }
        if action == Action::Create && !col.nullable && s.is_empty() {
            return Err(ValidationError(format!("{} is required", col.name)));
        }
    }
    Ok(())
}

/// Every table served by this crate.
pub fn all_tables() -> [&'static TableInfo; 7] {
    [
        LabelType::table_info(),
        TImage::table_info(),
        TImageSet::table_info(),
        TLabel::table_info(),
        TProject::table_info(),
        TProjectUser::table_info(),
        TUser::table_info(),
    ]
}
