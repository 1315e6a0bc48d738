//! Closed set of roles and the capabilities each one carries.

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Prefix the backend puts on granted authorities (`ROLE_manager`).
pub const AUTHORITY_PREFIX: &str = "ROLE_";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role tag: {0:?}")]
pub struct RoleParseError(pub String);

/// A user's role. Parsing is strict: an unknown tag is an error, never a default role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Customer,
    Server,
    Manager,
    Admin,
}

/// Something a role is allowed to do. Views are gated on capabilities, not on role names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    PlaceOrders,
    OperateRegister,
    ManageInventory,
    ViewReports,
    ManageUsers,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Customer, Role::Server, Role::Manager, Role::Admin];

    /// The bare tag stored on user records.
    pub fn tag(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Server => "server",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// The prefixed form returned by `/auth/login`.
    pub fn authority(self) -> String {
        format!("{AUTHORITY_PREFIX}{}", self.tag())
    }

    pub fn capabilities(self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Role::Customer => &[PlaceOrders],
            Role::Server => &[PlaceOrders, OperateRegister],
            Role::Manager => &[PlaceOrders, OperateRegister, ManageInventory, ViewReports],
            Role::Admin => &[
                PlaceOrders,
                OperateRegister,
                ManageInventory,
                ViewReports,
                ManageUsers,
            ],
        }
    }

    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    /// Accepts both `ROLE_admin` and `admin`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.strip_prefix(AUTHORITY_PREFIX).unwrap_or(s);
        Role::ALL
            .into_iter()
            .find(|role| role.tag() == tag)
            .ok_or_else(|| RoleParseError(s.to_string()))
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
