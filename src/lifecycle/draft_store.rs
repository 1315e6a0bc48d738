use crate::api::ApiError;
use crate::clients::{ActorClient, CartClient, IngredientClient, MenuItemClient};
use crate::config::ClientConfig;
use crate::framework::{BackendContext, CacheActor, WriteTicket};
use crate::model::{Ingredient, IngredientId, ItemCategory, MenuItem, MenuItemId, Order};
use crate::store::{
    menu_by_category, Cart, CartActor, CartContext, CategoryTab, CheckoutReceipt, DraftSnapshot,
    OrderEditor, StoreError,
};
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// The order draft store: the live cart plus the cached menu, categories and ingredients.
///
/// `DraftStore` is the context object views are handed. It owns the actors behind it and
/// is responsible for:
/// - **Initialization**: fetching the reference lists once and seeding the caches
/// - **Dependency Wiring**: giving the cart actor the menu it prices against
/// - **Lifecycle Management**: stopping every actor on [`shutdown`](Self::shutdown)
///
/// # Example
///
/// ```ignore
/// let store = DraftStore::start(context, &config).await;
///
/// store.add_entry(MenuItemId(4)).await?;
/// let receipt = store.checkout().await?;   // cart is empty from here on
///
/// store.shutdown().await?;
/// ```
pub struct DraftStore {
    pub cart: CartClient,
    pub menu_items: MenuItemClient,
    pub ingredients: IngredientClient,
    item_categories: RwLock<Vec<ItemCategory>>,
    context: BackendContext,
    handles: Vec<JoinHandle<()>>,
}

impl DraftStore {
    /// Fetches `/menuItems`, `/itemCategories` and `/ingredients`, then starts the actors.
    ///
    /// A failed fetch goes through the no-redirect handler and leaves that list empty; the
    /// store starts regardless.
    #[instrument(skip_all)]
    pub async fn start(context: BackendContext, config: &ClientConfig) -> Self {
        let (menu_items, item_categories, ingredients) = Self::fetch_reference(&context).await;

        // 1. Create actors
        let (menu_actor, menu_cache) =
            CacheActor::<MenuItem>::new(config.channel_capacity, config.write_policy);
        let (ingredient_actor, ingredient_cache) =
            CacheActor::<Ingredient>::new(config.channel_capacity, config.write_policy);
        let (cart_actor, cart) = CartActor::new(config.channel_capacity);

        // 2. Start actors with injected context
        let cart_context = CartContext {
            backend: context.clone(),
            menu: menu_cache.clone(),
        };
        let handles = vec![
            tokio::spawn(menu_actor.run(context.clone())),
            tokio::spawn(ingredient_actor.run(context.clone())),
            tokio::spawn(cart_actor.run(cart_context)),
        ];

        // 3. Seed the caches. The actors were just spawned, so these cannot fail.
        let _ = menu_cache.load(menu_items).await;
        let _ = ingredient_cache.load(ingredients).await;

        info!(categories = item_categories.len(), "Draft store started");
        Self {
            cart,
            menu_items: MenuItemClient::new(menu_cache),
            ingredients: IngredientClient::new(ingredient_cache),
            item_categories: RwLock::new(item_categories),
            context,
            handles,
        }
    }

    async fn fetch_reference(
        context: &BackendContext,
    ) -> (Vec<MenuItem>, Vec<ItemCategory>, Vec<Ingredient>) {
        let api = &context.api;
        let (menu_items, item_categories, ingredients) =
            tokio::join!(api.menu_items(), api.item_categories(), api.ingredients());
        (
            Self::or_empty(context, menu_items),
            Self::or_empty(context, item_categories),
            Self::or_empty(context, ingredients),
        )
    }

    fn or_empty<T>(context: &BackendContext, fetched: Result<Vec<T>, ApiError>) -> Vec<T> {
        fetched.unwrap_or_else(|e| {
            context.report_no_redirect(&e);
            Vec::new()
        })
    }

    /// Re-fetches the reference lists and replaces the cached copies. The cart is kept.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), StoreError> {
        let (menu_items, item_categories, ingredients) =
            Self::fetch_reference(&self.context).await;
        self.menu_items.inner().load(menu_items).await?;
        self.ingredients.inner().load(ingredients).await?;
        *self.item_categories.write() = item_categories;
        Ok(())
    }

    // Cart

    pub async fn add_entry(&self, item_id: MenuItemId) -> Result<Cart, StoreError> {
        self.cart.add_entry(item_id).await
    }

    pub async fn increment_quantity(&self, item_id: MenuItemId) -> Result<Cart, StoreError> {
        self.cart.increment_quantity(item_id).await
    }

    pub async fn decrement_quantity(&self, item_id: MenuItemId) -> Result<Cart, StoreError> {
        self.cart.decrement_quantity(item_id).await
    }

    /// Submits the cart as a new order and clears it, whatever the backend later says.
    pub async fn checkout(&self) -> Result<CheckoutReceipt, StoreError> {
        self.cart.checkout().await
    }

    // Reference data

    pub async fn change_menu_item(
        &self,
        id: MenuItemId,
        item: MenuItem,
    ) -> Result<WriteTicket, StoreError> {
        self.menu_items.change(id, item).await
    }

    pub async fn add_menu_item(&self, item: MenuItem) -> Result<WriteTicket, StoreError> {
        self.menu_items.add(item).await
    }

    pub async fn delete_menu_item(&self, id: MenuItemId) -> Result<WriteTicket, StoreError> {
        self.menu_items.delete(id).await
    }

    pub async fn change_ingredient(
        &self,
        id: IngredientId,
        ingredient: Ingredient,
    ) -> Result<WriteTicket, StoreError> {
        self.ingredients.change(id, ingredient).await
    }

    pub async fn add_ingredient(&self, ingredient: Ingredient) -> Result<WriteTicket, StoreError> {
        self.ingredients.add(ingredient).await
    }

    pub async fn delete_ingredient(&self, id: IngredientId) -> Result<WriteTicket, StoreError> {
        self.ingredients.delete(id).await
    }

    pub fn item_categories(&self) -> Vec<ItemCategory> {
        self.item_categories.read().clone()
    }

    // Views

    pub async fn snapshot(&self) -> Result<DraftSnapshot, StoreError> {
        let (cart, menu_items, ingredients) = tokio::try_join!(
            self.cart.snapshot(),
            self.menu_items.all(),
            self.ingredients.all()
        )?;
        Ok(DraftSnapshot {
            cart,
            menu_items,
            item_categories: self.item_categories(),
            ingredients,
        })
    }

    pub async fn menu_by_category(&self) -> Result<Vec<CategoryTab>, StoreError> {
        let menu = self.menu_items.all().await?;
        Ok(menu_by_category(&self.item_categories.read(), &menu))
    }

    /// Opens a placed order for amendment, priced against this store's menu.
    pub async fn edit_order(&self, order: Order) -> Result<OrderEditor, StoreError> {
        OrderEditor::open(self.context.clone(), self.menu_items.inner().clone(), order).await
    }

    /// Waits until every menu and ingredient write issued so far has settled.
    pub async fn flush(&self) -> Result<(), StoreError> {
        tokio::try_join!(self.menu_items.flush(), self.ingredients.flush())?;
        Ok(())
    }

    /// Gracefully shuts the store down.
    ///
    /// Dropping the clients closes the actors' channels. Each actor then finishes its
    /// pending writes (or order submissions) and exits; this waits for all of them.
    pub async fn shutdown(self) -> Result<(), StoreError> {
        info!("Shutting down draft store...");
        drop(self.cart);
        drop(self.menu_items);
        drop(self.ingredients);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(StoreError::TaskFailed(e.to_string()));
            }
        }

        info!("Draft store shutdown complete.");
        Ok(())
    }
}
