use crate::clients::actor_client::ActorClient;
use crate::framework::{CacheClient, CachedEntity, FrameworkError};
use crate::model::{Ingredient, IngredientId};
use crate::store::StoreError;
use async_trait::async_trait;
use tracing::{debug, instrument};

impl CachedEntity for Ingredient {
    type Id = IngredientId;

    const RESOURCE: &'static str = "/ingredients";

    fn id(&self) -> Option<IngredientId> {
        self.id
    }

    fn set_id(&mut self, id: IngredientId) {
        self.id = Some(id);
    }
}

/// Client for the cached ingredient inventory.
#[derive(Clone)]
pub struct IngredientClient {
    inner: CacheClient<Ingredient>,
}

impl IngredientClient {
    pub fn new(inner: CacheClient<Ingredient>) -> Self {
        Self { inner }
    }

    /// Cached ingredients whose stock is below their restock threshold.
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<Ingredient>, StoreError> {
        let low: Vec<Ingredient> = self
            .all()
            .await?
            .into_iter()
            .filter(Ingredient::needs_restock)
            .collect();
        debug!(size = low.len(), "Low stock");
        Ok(low)
    }
}

#[async_trait]
impl ActorClient<Ingredient> for IngredientClient {
    type Error = StoreError;

    fn inner(&self) -> &CacheClient<Ingredient> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        StoreError::ActorCommunication(e)
    }
}
