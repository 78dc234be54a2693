//! User account models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_admin: bool,
    pub date_joined: DateTime<Utc>,
}

/// Public wire representation of a user
///
/// Password material and admin flags never leave the server; API responses
/// carry this shape only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}
