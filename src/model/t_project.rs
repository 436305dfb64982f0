use super::Record;
use super::StorageType::{Int8, Timestamp, Varchar};
use chrono::NaiveDateTime;

record! {
    /// Row of `t_project`.
    pub struct TProject in "t_project" {
        [0] key id: i64 => "id", Int8;
        #[serde(with = "crate::model::timestamp::option")]
        [1] created_date: Option<NaiveDateTime> => "created_date", Timestamp;
        [2] name: Option<String> => "name", Varchar(255);
        [3] admin_id: i64 => "admin_id", Int8;
        [4] image_set_id: Option<i64> => "image_set_id", Int8;
    }
}

impl Record for TProject {
    const ROUTE: &'static str = "tproject";
}
