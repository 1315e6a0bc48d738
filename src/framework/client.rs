//! # Cache Client
//!
//! The handle through which the rest of the crate talks to a [`CacheActor`](crate::framework::CacheActor).

use crate::framework::{CacheRequest, CachedEntity, FrameworkError, WriteTicket};
use tokio::sync::{mpsc, oneshot};

/// A type-safe, cheaply cloneable handle to one cache actor.
///
/// Every method is a single request/response round trip; none of them waits for the
/// backend except [`flush`](Self::flush).
pub struct CacheClient<T: CachedEntity> {
    sender: mpsc::Sender<CacheRequest<T>>,
}

impl<T: CachedEntity> Clone for CacheClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: CachedEntity> CacheClient<T> {
    pub fn new(sender: mpsc::Sender<CacheRequest<T>>) -> Self {
        Self { sender }
    }

    /// A handle that does not keep the actor running.
    pub fn downgrade(&self) -> WeakCacheClient<T> {
        WeakCacheClient {
            sender: self.sender.downgrade(),
        }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> CacheRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// The cached list in display order.
    pub async fn snapshot(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| CacheRequest::Snapshot { respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| CacheRequest::Get { id, respond_to })
            .await
    }

    pub async fn load(&self, items: Vec<T>) -> Result<usize, FrameworkError> {
        self.request(|respond_to| CacheRequest::Load { items, respond_to })
            .await
    }

    pub async fn insert(&self, item: T) -> Result<WriteTicket, FrameworkError> {
        self.request(|respond_to| CacheRequest::Insert { item, respond_to })
            .await
    }

    pub async fn replace(&self, id: T::Id, item: T) -> Result<WriteTicket, FrameworkError> {
        self.request(|respond_to| CacheRequest::Replace {
            id,
            item,
            respond_to,
        })
        .await
    }

    pub async fn remove(&self, id: T::Id) -> Result<WriteTicket, FrameworkError> {
        self.request(|respond_to| CacheRequest::Remove { id, respond_to })
            .await
    }

    /// Waits until every write issued so far has settled.
    pub async fn flush(&self) -> Result<(), FrameworkError> {
        self.request(|respond_to| CacheRequest::Flush { respond_to })
            .await
    }

    pub async fn pending_writes(&self) -> Result<usize, FrameworkError> {
        self.request(|respond_to| CacheRequest::PendingWrites { respond_to })
            .await
    }
}

/// Non-owning counterpart of [`CacheClient`]. Once every strong client is dropped the actor
/// shuts down regardless of how many weak ones remain.
pub struct WeakCacheClient<T: CachedEntity> {
    sender: mpsc::WeakSender<CacheRequest<T>>,
}

impl<T: CachedEntity> Clone for WeakCacheClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: CachedEntity> WeakCacheClient<T> {
    pub fn upgrade(&self) -> Result<CacheClient<T>, FrameworkError> {
        self.sender
            .upgrade()
            .map(CacheClient::new)
            .ok_or(FrameworkError::ActorClosed)
    }
}
