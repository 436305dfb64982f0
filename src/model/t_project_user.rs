use super::Record;
use super::StorageType::Int8;

record! {
    /// Row of `t_project_user`. The table declares no key; `project_id` serves as one.
    pub struct TProjectUser in "t_project_user" {
        [0] key project_id: i64 => "project_id", Int8;
        [1] user_id: i64 => "user_id", Int8;
    }
}

impl Record for TProjectUser {
    const ROUTE: &'static str = "tprojectuser";
}
