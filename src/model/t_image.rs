use super::Record;
use super::StorageType::{Int8, Varchar};

record! {
    /// Row of `t_image`.
    pub struct TImage in "t_image" {
        [0] key id: i64 => "id", Int8;
        [1] name: Option<String> => "name", Varchar(255);
        [2] url: Option<String> => "url", Varchar(255);
        [3] image_set_id: i64 => "image_set_id", Int8;
        [4] user_id: Option<i64> => "user_id", Int8;
    }
}

impl Record for TImage {
    const ROUTE: &'static str = "timage";
}
