use crate::api::{handle_errors, handle_errors_no_redirect, ApiClient, ApiError, Recovery, RecoverySink};
use crate::auth::CredentialStore;
use std::sync::Arc;

/// Dependencies injected into every actor's `run` loop.
///
/// Bundles the backend client with what the shared error handlers need, so a failed
/// request can be reported from wherever it completes.
#[derive(Clone)]
pub struct BackendContext {
    pub api: ApiClient,
    pub credentials: Arc<dyn CredentialStore>,
    pub recovery: RecoverySink,
}

impl BackendContext {
    pub fn new(api: ApiClient, credentials: Arc<dyn CredentialStore>, recovery: RecoverySink) -> Self {
        Self {
            api,
            credentials,
            recovery,
        }
    }

    /// Runs [`handle_errors`] and forwards the outcome to the UI.
    pub fn report(&self, error: &ApiError) -> Recovery {
        let recovery = handle_errors(error, self.credentials.as_ref());
        self.recovery.publish(recovery);
        recovery
    }

    /// Runs [`handle_errors_no_redirect`] and forwards the outcome to the UI.
    pub fn report_no_redirect(&self, error: &ApiError) -> Recovery {
        let recovery = handle_errors_no_redirect(error, self.credentials.as_ref());
        self.recovery.publish(recovery);
        recovery
    }
}
