use crate::clients::actor_client::ActorClient;
use crate::framework::{CacheClient, CachedEntity, FrameworkError};
use crate::model::{MenuItem, MenuItemId};
use crate::store::StoreError;
use async_trait::async_trait;

impl CachedEntity for MenuItem {
    type Id = MenuItemId;

    const RESOURCE: &'static str = "/menuItems";

    fn id(&self) -> Option<MenuItemId> {
        self.id
    }

    fn set_id(&mut self, id: MenuItemId) {
        self.id = Some(id);
    }

    // `ingredients` is write-only on the backend.
    fn merge_confirmed(&mut self, stored: Self) {
        let ingredients = std::mem::take(&mut self.ingredients);
        *self = stored;
        self.ingredients = ingredients;
    }
}

/// Client for the cached menu.
#[derive(Clone)]
pub struct MenuItemClient {
    inner: CacheClient<MenuItem>,
}

impl MenuItemClient {
    pub fn new(inner: CacheClient<MenuItem>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<MenuItem> for MenuItemClient {
    type Error = StoreError;

    fn inner(&self) -> &CacheClient<MenuItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        StoreError::ActorCommunication(e)
    }
}
