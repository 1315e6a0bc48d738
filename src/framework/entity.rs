//! # CachedEntity Trait
//!
//! The contract a backend resource must satisfy to be held by a [`CacheActor`](crate::framework::CacheActor).
//!
//! The actor logic is written once against this trait and reused for menu items and
//! ingredients. An entity only has to say where it lives on the backend and how to read
//! and assign its identifier; everything else (optimistic application, write tracking,
//! reconciliation) is provided by the actor.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A backend resource cached locally and written through `POST`/`DELETE` on [`RESOURCE`](CachedEntity::RESOURCE).
pub trait CachedEntity:
    Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Server-assigned identifier. Travels as an integer `id` query parameter on delete.
    type Id: Copy + Eq + Hash + Display + Debug + Send + Sync + Into<i32> + 'static;

    /// Resource path, e.g. `/menuItems`.
    const RESOURCE: &'static str;

    /// `None` until the backend has assigned one.
    fn id(&self) -> Option<Self::Id>;

    fn set_id(&mut self, id: Self::Id);

    /// Folds the backend's copy of a confirmed write into the cached one.
    ///
    /// Entities with write-only fields override this to keep their local values, since the
    /// backend's copy never carries them.
    fn merge_confirmed(&mut self, stored: Self) {
        *self = stored;
    }
}
