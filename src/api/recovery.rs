//! The two error handlers shared by every backend call.
//!
//! Neither handler surfaces an actionable message: they log the failure and, for
//! authentication and authorization failures, tell the UI where to go next.
//!
//! | Failure             | [`handle_errors_no_redirect`]   | [`handle_errors`]                 |
//! |---------------------|---------------------------------|-----------------------------------|
//! | 401, token stored   | clear token, `Reload`           | clear token, `Redirect(Login)`    |
//! | 401, no token       | log only                        | log only                          |
//! | 403                 | log only                        | `Redirect(Unauthorized)`          |
//! | transport / other   | log only                        | log only                          |

use crate::api::ApiError;
use crate::auth::{CredentialStore, View};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// What the UI should do after a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Nothing beyond the log line.
    Continue,
    /// Re-initialize the client from scratch (re-fetch everything, re-authenticate).
    Reload,
    /// Navigate to a view.
    Redirect(View),
}

/// Logs the failure; on 401 with a stored credential, clears it and asks for a reload.
pub fn handle_errors_no_redirect(error: &ApiError, credentials: &dyn CredentialStore) -> Recovery {
    log_failure(error);
    if *error == ApiError::Unauthorized && credentials.has_token() {
        credentials.clear();
        info!("Credential rejected, cleared");
        return Recovery::Reload;
    }
    Recovery::Continue
}

/// Like [`handle_errors_no_redirect`] but sends the user to the login or unauthorized view.
pub fn handle_errors(error: &ApiError, credentials: &dyn CredentialStore) -> Recovery {
    log_failure(error);
    match error {
        ApiError::Forbidden => Recovery::Redirect(View::Unauthorized),
        ApiError::Unauthorized if credentials.has_token() => {
            credentials.clear();
            info!("Credential rejected, cleared");
            Recovery::Redirect(View::Login)
        }
        _ => Recovery::Continue,
    }
}

fn log_failure(error: &ApiError) {
    match error {
        ApiError::Transport(detail) => warn!(%detail, "No response from backend"),
        ApiError::InvalidRequest(detail) => warn!(%detail, "Request could not be built"),
        other => warn!(status = ?other.status(), error = %other, "Backend request failed"),
    }
}

/// Where recoveries are delivered. Cheap to clone.
///
/// `Continue` is never forwarded. A closed receiver is ignored.
#[derive(Debug, Clone)]
pub struct RecoverySink {
    sender: mpsc::UnboundedSender<Recovery>,
}

impl RecoverySink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Recovery>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn publish(&self, recovery: Recovery) {
        if recovery != Recovery::Continue {
            let _ = self.sender.send(recovery);
        }
    }
}
