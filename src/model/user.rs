use crate::auth::{Role, RoleParseError};
use crate::model::UserId;
use serde::{Deserialize, Serialize};

/// A staff or customer account as managed from the admin screens.
///
/// `role` is kept as the raw backend tag so that rows with tags this client does not know
/// still load; use [`User::parsed_role`] to get the closed [`Role`] value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: None,
            username: username.into(),
            password: String::new(),
            email: email.into(),
            role: role.tag().to_string(),
        }
    }

    pub fn parsed_role(&self) -> Result<Role, RoleParseError> {
        self.role.parse()
    }
}

/// Answer of `/auth/login`: the principal name and its first granted authority.
///
/// Either field may be empty when the backend has nothing to report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInfo {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub role: String,
}
