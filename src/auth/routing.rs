//! Role-gated navigation between the top-level views.

use crate::auth::{Capability, Role};
use tracing::debug;

/// Top-level views of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Landing,
    Customer,
    Server,
    Manager,
    Admin,
    Login,
    Unauthorized,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Landing,
        View::Customer,
        View::Server,
        View::Manager,
        View::Admin,
        View::Login,
        View::Unauthorized,
    ];

    pub fn path(self) -> &'static str {
        match self {
            View::Landing => "/",
            View::Customer => "/customer",
            View::Server => "/server",
            View::Manager => "/manager",
            View::Admin => "/admin",
            View::Login => "/login",
            View::Unauthorized => "/unauthorized",
        }
    }

    pub fn from_path(path: &str) -> Option<View> {
        View::ALL.into_iter().find(|view| view.path() == path)
    }

    /// Capability needed to open the view; `None` means the view is public.
    pub fn required_capability(self) -> Option<Capability> {
        match self {
            View::Server => Some(Capability::OperateRegister),
            View::Manager => Some(Capability::ManageInventory),
            View::Admin => Some(Capability::ManageUsers),
            View::Landing | View::Customer | View::Login | View::Unauthorized => None,
        }
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted(View),
    Denied { requested: View, redirect: View },
}

impl Access {
    /// The view that should actually be shown.
    pub fn view(self) -> View {
        match self {
            Access::Granted(view) => view,
            Access::Denied { redirect, .. } => redirect,
        }
    }

    pub fn is_granted(self) -> bool {
        matches!(self, Access::Granted(_))
    }
}

/// Grants `view` iff its required capability is in the role's capability set.
pub fn authorize(role: Option<Role>, view: View) -> Access {
    let granted = match view.required_capability() {
        None => true,
        Some(capability) => role.is_some_and(|role| role.can(capability)),
    };
    debug!(?role, ?view, granted, "Authorize");
    if granted {
        Access::Granted(view)
    } else {
        Access::Denied {
            requested: view,
            redirect: View::Unauthorized,
        }
    }
}

/// Where to send a user right after signing in.
pub fn home_view(role: Option<Role>) -> View {
    match role {
        Some(Role::Manager) => View::Manager,
        Some(Role::Server) => View::Server,
        _ => View::Landing,
    }
}
