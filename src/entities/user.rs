//! Admin accounts. Existing admins are never listed, only created.

use serde::{Deserialize, Serialize};

use crate::net::Resource;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdmin {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl NewAdmin {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into(), role: ADMIN_ROLE.to_owned() }
    }

    #[must_use]
    pub fn resource() -> Resource {
        Resource::rest("users")
    }
}
