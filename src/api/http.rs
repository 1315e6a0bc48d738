//! reqwest-backed [`Backend`].

use crate::api::backend::{Backend, Query};
use crate::api::ApiError;
use crate::auth::CredentialStore;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Sends JSON requests to the backend, attaching the stored credential as a bearer token.
///
/// The token is read on every request, so signing in or out takes effect immediately.
/// No timeout is configured beyond the transport default.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpBackend {
    pub fn new(base_url: &str, credentials: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid base url {base_url:?}: {e}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Resolves a resource path against the base URL, keeping any base path prefix.
    pub fn url(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), body))
    }

    async fn read_json(response: Response) -> Result<Value, ApiError> {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    #[instrument(skip(self, query))]
    async fn get_json(&self, path: &str, query: &Query) -> Result<Value, ApiError> {
        let request = self.authorize(self.client.get(self.url(path)).query(query));
        let response = Self::check(request.send().await?).await?;
        debug!(status = %response.status(), "GET ok");
        Self::read_json(response).await
    }

    #[instrument(skip(self, body))]
    async fn post_json(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let request = self.authorize(self.client.post(self.url(path)).json(&body));
        let response = Self::check(request.send().await?).await?;
        debug!(status = %response.status(), "POST ok");
        Self::read_json(response).await
    }

    #[instrument(skip(self, query))]
    async fn delete(&self, path: &str, query: &Query) -> Result<(), ApiError> {
        let request = self.authorize(self.client.delete(self.url(path)).query(query));
        let response = Self::check(request.send().await?).await?;
        debug!(status = %response.status(), "DELETE ok");
        Ok(())
    }
}
