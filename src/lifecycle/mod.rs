//! Startup and shutdown of the draft store, and process-wide tracing.

pub mod draft_store;
pub mod tracing;

pub use draft_store::DraftStore;
pub use self::tracing::setup_tracing;
