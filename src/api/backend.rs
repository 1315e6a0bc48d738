//! The transport seam between the client and the REST backend.

use crate::api::ApiError;
use async_trait::async_trait;
use serde_json::Value;

/// Query parameters as `(name, value)` pairs.
pub type Query = [(&'static str, String)];

/// Raw JSON access to the backend.
///
/// Everything above this trait ([`ApiClient`](crate::api::ApiClient), the cache actors, the
/// cart) is written against it, so tests swap in [`MockBackend`](crate::api::mock::MockBackend)
/// while production uses [`HttpBackend`](crate::api::HttpBackend).
///
/// Paths are absolute resource paths such as `/menuItems`. POST is an upsert: a body with
/// an `id` updates, a body without one creates.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    async fn get_json(&self, path: &str, query: &Query) -> Result<Value, ApiError>;

    async fn post_json(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    async fn delete(&self, path: &str, query: &Query) -> Result<(), ApiError>;
}
