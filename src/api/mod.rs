//! REST access to the restaurant backend.
//!
//! [`Backend`] is the transport seam; [`ApiClient`] adds the typed endpoints on top;
//! [`recovery`] holds the error handlers every caller shares.

pub mod backend;
pub mod client;
pub mod error;
pub mod http;
pub mod mock;
pub mod recovery;

pub use backend::{Backend, Query};
pub use client::ApiClient;
pub use error::ApiError;
pub use http::HttpBackend;
pub use recovery::{handle_errors, handle_errors_no_redirect, Recovery, RecoverySink};
