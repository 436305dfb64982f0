//! Dynamically typed cell values. Records are stored, bound, and merged in this row form.

use chrono::NaiveDateTime;
use std::cmp::Ordering;
use thiserror::Error;

/// One cell of a row, in the column's storage type.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Int8(i64),
    Int4(i32),
    Bool(bool),
    Text(String),
    Timestamp(NaiveDateTime),
}

/// Cells of one record in column ordinal order.
pub type Row = Vec<FieldValue>;

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Zero value of the underlying type. Null counts as zero.
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Int8(n) => *n == 0,
            FieldValue::Int4(n) => *n == 0,
            FieldValue::Bool(b) => !*b,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Timestamp(t) => *t == NaiveDateTime::default(),
        }
    }

    /// Whether a patch cell counts as sent. Nullable columns are sent when not null,
    /// plain columns when not zero.
    pub fn is_present(&self, nullable: bool) -> bool {
        if nullable {
            !self.is_null()
        } else {
            !self.is_zero()
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Int8(_) => "int8",
            FieldValue::Int4(_) => "int4",
            FieldValue::Bool(_) => "bool",
            FieldValue::Text(_) => "text",
            FieldValue::Timestamp(_) => "timestamp",
        }
    }

    /// Total order used for in-process sorting. Nulls sort first; integers compare across widths.
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (Int8(a), Int8(b)) => a.cmp(b),
            (Int4(a), Int4(b)) => a.cmp(b),
            (Int8(a), Int4(b)) => a.cmp(&i64::from(*b)),
            (Int4(a), Int8(b)) => i64::from(*a).cmp(b),
            (Bool(a), Bool(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (a, b) => a.type_name().cmp(b.type_name()),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Int8(n) => write!(f, "{}", n),
            FieldValue::Int4(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Timestamp(t) => write!(f, "{}", t),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int8(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int4(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(v: NaiveDateTime) -> Self {
        FieldValue::Timestamp(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Failure turning a row back into a typed record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("row is missing column {0}")]
    MissingColumn(&'static str),
    #[error("column {column}: unexpected {found} value")]
    TypeMismatch { column: &'static str, found: &'static str },
}

/// Typed field that can be read back out of a cell.
pub trait FromField: Sized {
    /// Whether the field type admits null (the `Option` wrapper).
    const NULLABLE: bool = false;

    /// Returns the cell back on mismatch so the caller can report what it found.
    fn from_field(value: FieldValue) -> Result<Self, FieldValue>;
}

impl FromField for i64 {
    fn from_field(value: FieldValue) -> Result<Self, FieldValue> {
        match value {
            FieldValue::Int8(n) => Ok(n),
            FieldValue::Int4(n) => Ok(i64::from(n)),
            other => Err(other),
        }
    }
}

impl FromField for i32 {
    fn from_field(value: FieldValue) -> Result<Self, FieldValue> {
        match value {
            FieldValue::Int4(n) => Ok(n),
            FieldValue::Int8(n) => i32::try_from(n).map_err(|_| FieldValue::Int8(n)),
            other => Err(other),
        }
    }
}

impl FromField for bool {
    fn from_field(value: FieldValue) -> Result<Self, FieldValue> {
        match value {
            FieldValue::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl FromField for String {
    fn from_field(value: FieldValue) -> Result<Self, FieldValue> {
        match value {
            FieldValue::Text(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FromField for NaiveDateTime {
    fn from_field(value: FieldValue) -> Result<Self, FieldValue> {
        match value {
            FieldValue::Timestamp(t) => Ok(t),
            other => Err(other),
        }
    }
}

impl<T: FromField> FromField for Option<T> {
    const NULLABLE: bool = true;

    fn from_field(value: FieldValue) -> Result<Self, FieldValue> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_field(other).map(Some),
        }
    }
}

/// Pull the next cell out of a row iterator as `T`.
pub fn take_cell<T: FromField>(
    cells: &mut impl Iterator<Item = FieldValue>,
    column: &'static str,
) -> Result<T, RowError> {
    let value = cells.next().ok_or(RowError::MissingColumn(column))?;
    T::from_field(value).map_err(|found| RowError::TypeMismatch {
        column,
        found: found.type_name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_depends_on_nullability() {
        assert!(!FieldValue::Int8(0).is_present(false));
        assert!(FieldValue::Int8(0).is_present(true));
        assert!(!FieldValue::Null.is_present(true));
        assert!(!FieldValue::Text(String::new()).is_present(false));
        assert!(FieldValue::Text(String::new()).is_present(true));
        assert!(FieldValue::Bool(false).is_present(true));
        assert!(!FieldValue::Bool(false).is_present(false));
    }

    #[test]
    fn option_cells_read_null_as_none() {
        let v: Option<i64> = FromField::from_field(FieldValue::Null).unwrap();
        assert_eq!(v, None);
        let v: Option<i64> = FromField::from_field(FieldValue::Int8(7)).unwrap();
        assert_eq!(v, Some(7));
    }

    #[test]
    fn plain_cells_reject_null() {
        let mut cells = vec![FieldValue::Null].into_iter();
        let err = take_cell::<i64>(&mut cells, "id").unwrap_err();
        assert_eq!(
            err,
            RowError::TypeMismatch {
                column: "id",
                found: "null"
            }
        );
    }

    #[test]
    fn missing_cell_is_reported() {
        let mut cells = Vec::<FieldValue>::new().into_iter();
        assert_eq!(
            take_cell::<String>(&mut cells, "name").unwrap_err(),
            RowError::MissingColumn("name")
        );
    }

    #[test]
    fn int4_narrowing_checks_range() {
        assert_eq!(i32::from_field(FieldValue::Int8(12)), Ok(12));
        assert!(i32::from_field(FieldValue::Int8(i64::MAX)).is_err());
    }

    #[test]
    fn nulls_sort_first() {
        let mut cells = vec![
            FieldValue::Int8(3),
            FieldValue::Null,
            FieldValue::Int4(1),
        ];
        cells.sort_by(|a, b| a.sort_cmp(b));
        assert_eq!(
            cells,
            vec![FieldValue::Null, FieldValue::Int4(1), FieldValue::Int8(3)]
        );
    }
}
