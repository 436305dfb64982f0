use super::Record;
use super::StorageType::{Int8, Varchar};

record! {
    /// Row of `label_type`: a label category scoped to a project.
    pub struct LabelType in "label_type" {
        [0] key id: i64 => "id", Int8;
        [1] name: Option<String> => "name", Varchar(255);
        [2] project_id: i64 => "project_id", Int8;
    }
}

impl Record for LabelType {
    const ROUTE: &'static str = "labeltype";
}
