use super::StorageType::{Bool, Int4, Int8, Timestamp, Varchar};
use super::{Action, Record, RowCodec, ValidationError};
use chrono::NaiveDateTime;

record! {
    /// Row of `t_image_set`: a batch of images uploaded by one user.
    pub struct TImageSet in "t_image_set" {
        [0] key id: i64 => "id", Int8;
        #[serde(with = "crate::model::timestamp::option")]
        [1] created_date: Option<NaiveDateTime> => "created_date", Timestamp;
        [2] image_count: Option<i32> => "image_count", Int4;
        [3] is_used: Option<bool> => "is_used", Bool;
        [4] name: Option<String> => "name", Varchar(255);
        [5] project_id: Option<i64> => "project_id", Int8;
        [6] user_id: i64 => "user_id", Int8;
    }
}

impl Record for TImageSet {
    const ROUTE: &'static str = "timageset";

    fn validate(&self, action: Action) -> Result<(), ValidationError> {
        if matches!(self.image_count, Some(n) if n < 0) {
            return Err(ValidationError("image_count must not be negative".into()));
        }
        super::validate_columns(Self::table_info(), &self.to_row(), action)
    }
}
