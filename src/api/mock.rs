//! # Mock backend
//!
//! An in-process [`Backend`] for driving the client without a server.
//!
//! Register expectations with the fluent builders, hand the mock to an
//! [`ApiClient`](crate::api::ApiClient), then call [`MockBackend::verify`].
//!
//! ```ignore
//! let mock = Arc::new(MockBackend::new());
//! mock.expect_get("/menuItems").return_ok(json!([]));
//! mock.expect_post("/orders").return_err(ApiError::Transport("refused".into()));
//!
//! let api = ApiClient::new(mock.clone());
//! // ...
//! mock.verify();
//! ```
//!
//! Expectations are matched by method and path (and query, when one was given) in
//! registration order, so concurrent writes to different resources may arrive in any
//! order. A response can be held back with [`ExpectationBuilder::held_by`] to observe
//! optimistic state while a write is still in flight.

use crate::api::backend::{Backend, Query};
use crate::api::ApiError;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// A request as the mock saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

struct Expectation {
    method: Method,
    path: String,
    query: Option<Vec<(String, String)>>,
    response: Result<Value, ApiError>,
    gate: Option<Arc<Notify>>,
}

impl Expectation {
    fn matches(&self, method: Method, path: &str, query: &[(String, String)]) -> bool {
        self.method == method
            && self.path == path
            && self.query.as_deref().map_or(true, |expected| expected == query)
    }
}

#[derive(Default)]
pub struct MockBackend {
    expectations: Mutex<Vec<Expectation>>,
    requests: Mutex<Vec<RecordedRequest>>,
    unexpected: Mutex<Vec<RecordedRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_get(&self, path: &str) -> ExpectationBuilder<'_> {
        ExpectationBuilder::new(self, Method::Get, path)
    }

    pub fn expect_post(&self, path: &str) -> ExpectationBuilder<'_> {
        ExpectationBuilder::new(self, Method::Post, path)
    }

    pub fn expect_delete(&self, path: &str) -> ExpectationBuilder<'_> {
        ExpectationBuilder::new(self, Method::Delete, path)
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    /// Panics if an expectation was never met or a request matched none.
    pub fn verify(&self) {
        let unexpected = self.unexpected.lock();
        if !unexpected.is_empty() {
            panic!("Unexpected requests: {:?}", *unexpected);
        }
        let remaining = self.expectations.lock();
        if !remaining.is_empty() {
            let pending: Vec<String> = remaining
                .iter()
                .map(|e| format!("{} {}", e.method, e.path))
                .collect();
            panic!(
                "Not all expectations were met. {} remaining: {:?}",
                remaining.len(),
                pending
            );
        }
    }

    async fn respond(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let request = RecordedRequest {
            method,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            body,
        };
        self.requests.lock().push(request.clone());

        let expectation = {
            let mut exps = self.expectations.lock();
            let position = exps
                .iter()
                .position(|e| e.matches(method, path, &request.query));
            position.map(|index| exps.remove(index))
        };

        let Some(expectation) = expectation else {
            self.unexpected.lock().push(request);
            return Err(ApiError::Transport(format!(
                "no expectation for {method} {path}"
            )));
        };

        if let Some(gate) = expectation.gate {
            gate.notified().await;
        }
        expectation.response
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn get_json(&self, path: &str, query: &Query) -> Result<Value, ApiError> {
        self.respond(Method::Get, path, query, None).await
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.respond(Method::Post, path, &[], Some(body)).await
    }

    async fn delete(&self, path: &str, query: &Query) -> Result<(), ApiError> {
        self.respond(Method::Delete, path, query, None)
            .await
            .map(|_| ())
    }
}

/// Builder returned by the `expect_*` methods. Nothing is registered until a
/// `return_*` method is called.
pub struct ExpectationBuilder<'a> {
    mock: &'a MockBackend,
    method: Method,
    path: String,
    query: Option<Vec<(String, String)>>,
    gate: Option<Arc<Notify>>,
}

impl<'a> ExpectationBuilder<'a> {
    fn new(mock: &'a MockBackend, method: Method, path: &str) -> Self {
        Self {
            mock,
            method,
            path: path.to_string(),
            query: None,
            gate: None,
        }
    }

    /// Only match requests carrying exactly these query parameters.
    pub fn with_query(mut self, query: &[(&str, &str)]) -> Self {
        self.query = Some(
            query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    /// Hold the response until `gate` is notified.
    pub fn held_by(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn return_ok(self, value: Value) {
        self.register(Ok(value));
    }

    pub fn return_err(self, error: ApiError) {
        self.register(Err(error));
    }

    fn register(self, response: Result<Value, ApiError>) {
        self.mock.expectations.lock().push(Expectation {
            method: self.method,
            path: self.path,
            query: self.query,
            response,
            gate: self.gate,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_matches_by_method_and_path() {
        let mock = MockBackend::new();
        mock.expect_post("/orders").return_ok(json!({"id": 1}));
        mock.expect_get("/menuItems").return_ok(json!([]));

        assert_eq!(mock.get_json("/menuItems", &[]).await, Ok(json!([])));
        assert_eq!(
            mock.post_json("/orders", json!({})).await,
            Ok(json!({"id": 1}))
        );
        assert_eq!(mock.requests().len(), 2);
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected requests")]
    async fn test_unexpected_request_fails_verify() {
        let mock = MockBackend::new();
        let result = mock.delete("/users", &[("id", "3".to_string())]).await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_unmet_expectation_fails_verify() {
        let mock = MockBackend::new();
        mock.expect_get("/orders").return_ok(json!([]));
        mock.verify();
    }

    #[tokio::test]
    async fn test_gate_holds_response() {
        let mock = Arc::new(MockBackend::new());
        let gate = Arc::new(Notify::new());
        mock.expect_post("/ingredients")
            .held_by(gate.clone())
            .return_ok(json!({"id": 9, "name": "Tofu"}));

        let task = {
            let mock = mock.clone();
            tokio::spawn(async move { mock.post_json("/ingredients", json!({})).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!task.is_finished());
        assert_eq!(mock.requests_to(Method::Post, "/ingredients").len(), 1);

        gate.notify_one();
        assert!(task.await.unwrap().is_ok());
        mock.verify();
    }
}
