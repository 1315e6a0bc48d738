//! # Framework Errors
//!
//! Failures of the actor plumbing itself. Backend failures never travel this way: they are
//! settled inside the actor and reported through [`recovery`](crate::api::recovery).

/// Errors that can occur when talking to an actor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
}
