use serde::{Deserialize, Serialize};

/// One row of the users table. Field order is the column order on disk.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,  // bcrypt hash; rows from older installs may hold clear text
}
