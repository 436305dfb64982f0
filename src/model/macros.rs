//! `record!` declares a table row struct together with its column descriptors and row codec.
//!
//! ```ignore
//! record! {
//!     pub struct TUser in "t_user" {
//!         [0] key id: i64 => "id", Int8;
//!         [1] email: Option<String> => "email", Varchar(255);
//!     }
//! }
//! ```
//!
//! Attributes written before a non-key field's ordinal are applied to that field,
//! e.g. `#[serde(with = "...")]`.
//!
//! Ordinals must be listed in order starting at 0. Nullability comes from the field type:
//! `Option<_>` fields are nullable columns, everything else is required.

macro_rules! record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident in $table:literal {
            [$kord:literal] key $kfield:ident: $kty:ty => $kcol:literal, $kstorage:expr;
            $( $(#[$fmeta:meta])* [$ord:literal] $field:ident: $ty:ty => $col:literal, $storage:expr; )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        pub struct $name {
            pub $kfield: $kty,
            $( $(#[$fmeta])* pub $field: $ty, )*
        }

        impl $crate::model::RowCodec for $name {
            type Key = $kty;

            fn table_info() -> &'static $crate::model::TableInfo {
                static INFO: $crate::model::TableInfo = $crate::model::TableInfo {
                    name: $table,
                    key: $kord,
                    columns: &[
                        $crate::model::ColumnDescriptor::key($kord, $kcol, $kstorage),
                        $(
                            $crate::model::ColumnDescriptor::new(
                                $ord,
                                $col,
                                $storage,
                                <$ty as $crate::model::FromField>::NULLABLE,
                            ),
                        )*
                    ],
                };
                &INFO
            }

            fn key(&self) -> Self::Key {
                self.$kfield.clone()
            }

            fn to_row(&self) -> $crate::model::Row {
                vec![
                    self.$kfield.clone().into(),
                    $( self.$field.clone().into(), )*
                ]
            }

            fn from_row(row: $crate::model::Row) -> Result<Self, $crate::model::RowError> {
                let mut cells = row.into_iter();
                Ok($name {
                    $kfield: $crate::model::take_cell(&mut cells, $kcol)?,
                    $( $field: $crate::model::take_cell(&mut cells, $col)?, )*
                })
            }
        }
    };
}
