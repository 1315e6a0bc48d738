use crate::framework::{CacheClient, CachedEntity, FrameworkError, WriteTicket};
use async_trait::async_trait;

/// Trait for resource-specific cache clients to inherit the standard operations.
///
/// Implementors only supply the inner [`CacheClient`] and an error mapping; reads and
/// the three optimistic writes come for free.
#[async_trait]
pub trait ActorClient<T: CachedEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic CacheClient.
    fn inner(&self) -> &CacheClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    #[tracing::instrument(skip(self))]
    async fn all(&self) -> Result<Vec<T>, Self::Error> {
        self.inner().snapshot().await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Replaces the cached entity with `id`, then writes it to the backend.
    #[tracing::instrument(skip(self, item))]
    async fn change(&self, id: T::Id, item: T) -> Result<WriteTicket, Self::Error> {
        tracing::debug!(?item, "Sending request");
        self.inner().replace(id, item).await.map_err(Self::map_error)
    }

    /// Appends to the cache, then creates the entity on the backend.
    #[tracing::instrument(skip(self, item))]
    async fn add(&self, item: T) -> Result<WriteTicket, Self::Error> {
        tracing::debug!(?item, "Sending request");
        self.inner().insert(item).await.map_err(Self::map_error)
    }

    /// Drops the entity from the cache, then deletes it on the backend.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<WriteTicket, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().remove(id).await.map_err(Self::map_error)
    }

    /// Waits for every write issued so far to settle.
    async fn flush(&self) -> Result<(), Self::Error> {
        self.inner().flush().await.map_err(Self::map_error)
    }
}
