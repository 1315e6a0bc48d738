//! # Cache Messages
//!
//! Requests a [`CacheClient`](crate::framework::CacheClient) sends to its
//! [`CacheActor`](crate::framework::CacheActor), and the settlements write tasks send back.

use crate::api::ApiError;
use crate::framework::{CachedEntity, FrameworkError};
use std::fmt;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Identifies one in-flight backend write.
///
/// Tickets are handed out in request order and never reused by the same actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WriteTicket(pub u64);

impl fmt::Display for WriteTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "write_{}", self.0)
    }
}

/// Operations on the cached list.
///
/// Reads (`Snapshot`, `Get`, `PendingWrites`) and `Load` never touch the backend.
/// The three writes are applied to the list before the response is sent, then
/// forwarded to the backend in the background; the returned [`WriteTicket`] names that
/// background write.
#[derive(Debug)]
pub enum CacheRequest<T: CachedEntity> {
    Snapshot {
        respond_to: Response<Vec<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    /// Replace the whole list, e.g. after the initial fetch.
    Load {
        items: Vec<T>,
        respond_to: Response<usize>,
    },
    Insert {
        item: T,
        respond_to: Response<WriteTicket>,
    },
    Replace {
        id: T::Id,
        item: T,
        respond_to: Response<WriteTicket>,
    },
    Remove {
        id: T::Id,
        respond_to: Response<WriteTicket>,
    },
    /// Resolves once no write is pending.
    Flush {
        respond_to: Response<()>,
    },
    PendingWrites {
        respond_to: Response<usize>,
    },
}

/// Outcome of a background write, delivered back to the owning actor.
///
/// `Ok(Some(_))` carries the entity as the backend stored it; `Ok(None)` means the
/// backend confirmed without a readable body (always the case for deletes).
#[derive(Debug)]
pub(crate) struct Settlement<T: CachedEntity> {
    pub ticket: WriteTicket,
    pub outcome: Result<Option<T>, ApiError>,
}
