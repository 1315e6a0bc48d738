use crate::api::ApiError;
use crate::framework::FrameworkError;
use thiserror::Error;

/// Errors surfaced by the draft store and the order editor.
///
/// Backend failures of fire-and-forget writes never show up here; they are handled by the
/// recovery policy. Only operations that await the backend return [`StoreError::Backend`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Actor communication error: {0}")]
    ActorCommunication(#[from] FrameworkError),

    #[error("Backend error: {0}")]
    Backend(#[from] ApiError),

    #[error("Order has no id and cannot be edited")]
    UnsavedOrder,

    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}
