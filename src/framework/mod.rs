//! Generic write-through cache actors.
//!
//! # Main Components
//!
//! - [`CachedEntity`] - Trait a backend resource implements to be cached
//! - [`CacheActor`] - The actor owning one cached list and its pending writes
//! - [`CacheClient`] - Cloneable handle for talking to the actor
//! - [`WritePolicy`] - How settled writes are reconciled with the cache
//! - [`BackendContext`] - Dependencies injected when an actor starts running
//! - [`FrameworkError`] - Plumbing failures

pub mod actor;
pub mod client;
pub mod context;
pub mod entity;
pub mod error;
pub mod message;
pub mod policy;

pub use actor::CacheActor;
pub use client::{CacheClient, WeakCacheClient};
pub use context::BackendContext;
pub use entity::CachedEntity;
pub use error::FrameworkError;
pub use message::{CacheRequest, Response, WriteTicket};
pub use policy::WritePolicy;
