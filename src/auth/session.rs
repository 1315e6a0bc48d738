//! Who is signed in, as reported by the backend for the stored credential.

use crate::api::ApiClient;
use crate::auth::{authorize, home_view, Access, CredentialStore, Role, View};
use tracing::{info, instrument, warn};

/// The signed-in principal. An anonymous session has no role and an empty user name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: String,
    pub role: Option<Role>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Asks `/auth/login` who the stored credential belongs to.
    ///
    /// Any failure clears the credential and yields an anonymous session. Without a stored
    /// credential no request is made. A role tag this client does not know grants nothing.
    #[instrument(skip_all)]
    pub async fn check(api: &ApiClient, credentials: &dyn CredentialStore) -> Session {
        if !credentials.has_token() {
            return Session::anonymous();
        }
        let info = match api.login_info().await {
            Ok(info) => info,
            Err(e) => {
                warn!(error = %e, "Login check failed, clearing credential");
                credentials.clear();
                return Session::anonymous();
            }
        };

        let role = if info.role.is_empty() {
            None
        } else {
            match info.role.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!(error = %e, "Ignoring unknown role");
                    None
                }
            }
        };
        info!(user = %info.user, ?role, "Session established");
        Session {
            user: info.user,
            role,
        }
    }

    /// Stores a fresh credential from the identity provider, then checks it.
    pub async fn sign_in(
        api: &ApiClient,
        credentials: &dyn CredentialStore,
        token: String,
    ) -> Session {
        credentials.set_token(token);
        Session::check(api, credentials).await
    }

    pub fn sign_out(credentials: &dyn CredentialStore) -> Session {
        credentials.clear();
        info!("Signed out");
        Session::anonymous()
    }

    pub fn is_signed_in(&self) -> bool {
        !self.user.is_empty() || self.role.is_some()
    }

    pub fn authorize(&self, view: View) -> Access {
        authorize(self.role, view)
    }

    pub fn home(&self) -> View {
        home_view(self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use crate::api::ApiError;
    use crate::auth::MemoryCredentials;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_check_reads_role() {
        let mock = Arc::new(MockBackend::new());
        mock.expect_get("/auth/login")
            .return_ok(json!({"user": "pat", "role": "ROLE_server"}));
        let api = ApiClient::new(mock.clone());
        let creds = MemoryCredentials::with_token("token");

        let session = Session::check(&api, &creds).await;
        assert_eq!(session.role, Some(Role::Server));
        assert_eq!(session.home(), View::Server);
        assert!(session.authorize(View::Server).is_granted());
        assert!(!session.authorize(View::Manager).is_granted());
        mock.verify();
    }

    #[tokio::test]
    async fn test_check_failure_clears_credential() {
        let mock = Arc::new(MockBackend::new());
        mock.expect_get("/auth/login").return_err(ApiError::Unauthorized);
        let api = ApiClient::new(mock.clone());
        let creds = MemoryCredentials::with_token("expired");

        let session = Session::check(&api, &creds).await;
        assert_eq!(session, Session::anonymous());
        assert!(!creds.has_token());
    }

    #[tokio::test]
    async fn test_unknown_role_grants_nothing() {
        let mock = Arc::new(MockBackend::new());
        mock.expect_get("/auth/login")
            .return_ok(json!({"user": "eve", "role": "ROLE_superuser"}));
        let api = ApiClient::new(mock.clone());
        let creds = MemoryCredentials::with_token("token");

        let session = Session::check(&api, &creds).await;
        assert!(session.is_signed_in());
        assert_eq!(session.role, None);
        assert!(!session.authorize(View::Admin).is_granted());
    }

    #[tokio::test]
    async fn test_no_credential_skips_request() {
        let mock = Arc::new(MockBackend::new());
        let api = ApiClient::new(mock.clone());
        let session = Session::check(&api, &MemoryCredentials::new()).await;
        assert!(!session.is_signed_in());
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_sign_out() {
        let creds = MemoryCredentials::with_token("token");
        let session = Session::sign_out(&creds);
        assert!(!creds.has_token());
        assert_eq!(session.home(), View::Landing);
    }
}
