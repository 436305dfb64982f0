use super::Record;
use super::StorageType::{Int8, Timestamp, Varchar};
use chrono::NaiveDateTime;

record! {
    /// Row of `t_label`: one annotated region on an image. Geometry is stored as text.
    pub struct TLabel in "t_label" {
        [0] key id: i64 => "id", Int8;
        [1] comment: Option<String> => "comment", Varchar(255);
        #[serde(with = "crate::model::timestamp::option")]
        [2] created_date: Option<NaiveDateTime> => "created_date", Timestamp;
        [3] height: Option<String> => "height", Varchar(255);
        [4] width: Option<String> => "width", Varchar(255);
        [5] x: Option<String> => "x", Varchar(255);
        [6] y: Option<String> => "y", Varchar(255);
        [7] image_id: i64 => "image_id", Int8;
        [8] user_id: i64 => "user_id", Int8;
    }
}

impl Record for TLabel {
    const ROUTE: &'static str = "tlabel";
}
