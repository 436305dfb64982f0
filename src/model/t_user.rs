use super::StorageType::{Int8, Varchar};
use super::{validate_columns, Action, Record, RowCodec, ValidationError};

record! {
    /// Row of `t_user`.
    pub struct TUser in "t_user" {
        [0] key id: i64 => "id", Int8;
        [1] email: Option<String> => "email", Varchar(255);
        [2] name: String => "name", Varchar(25);
        [3] password: String => "password", Varchar(255);
        [4] surname: String => "surname", Varchar(25);
        [5] username: String => "username", Varchar(25);
    }
}

impl Record for TUser {
    const ROUTE: &'static str = "tuser";

    fn prepare(&mut self) {
        self.username = self.username.trim().to_string();
        self.name = self.name.trim().to_string();
        self.surname = self.surname.trim().to_string();
        if let Some(email) = self.email.as_mut() {
            *email = email.trim().to_lowercase();
        }
    }

    fn validate(&self, action: Action) -> Result<(), ValidationError> {
        validate_columns(Self::table_info(), &self.to_row(), action)?;
        if let Some(email) = &self.email {
            if !email.contains('@') || email.len() < 3 {
                return Err(ValidationError("email must be a valid email".into()));
            }
        }
        Ok(())
    }
}
