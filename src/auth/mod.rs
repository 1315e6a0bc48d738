//! Credentials, roles, the signed-in session and role-gated routing.

pub mod credentials;
pub mod role;
pub mod routing;
pub mod session;

pub use credentials::{CredentialStore, FileCredentials, MemoryCredentials};
pub use role::{Capability, Role, RoleParseError, AUTHORITY_PREFIX};
pub use routing::{authorize, home_view, Access, View};
pub use session::Session;
