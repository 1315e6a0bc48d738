//! Amending an order that was already placed.
//!
//! The editor works on its own [`Cart`] seeded from the order's items, prices it against the
//! cached menu, and resubmits the order under its original id, time, user and status.
//! Unlike the store checkout, [`OrderEditor::submit`] waits for the backend and leaves the
//! edited cart in place when the write fails.
//!
//! The editor only holds a weak handle on the menu, so an open editor never keeps the store
//! from shutting down. Pricing after shutdown fails with
//! [`FrameworkError::ActorClosed`](crate::framework::FrameworkError::ActorClosed).

use crate::framework::{BackendContext, CacheClient, WeakCacheClient};
use crate::model::{MenuItem, MenuItemId, Order};
use crate::store::{Cart, CartLine, StoreError};
use tracing::{info, instrument, warn};

pub struct OrderEditor {
    order: Order,
    cart: Cart,
    context: BackendContext,
    menu: WeakCacheClient<MenuItem>,
}

impl OrderEditor {
    /// Loads the items of `order` from the backend.
    #[instrument(skip_all, fields(order_id = ?order.id))]
    pub async fn open(
        context: BackendContext,
        menu: CacheClient<MenuItem>,
        order: Order,
    ) -> Result<Self, StoreError> {
        let order_id = order.id.ok_or(StoreError::UnsavedOrder)?;
        let rows = match context.api.order_items(order_id).await {
            Ok(rows) => rows,
            Err(e) => {
                context.report(&e);
                return Err(e.into());
            }
        };
        let cart = Cart::from_quantities(rows.into_iter().filter_map(|row| match row.entity.id {
            Some(id) => Some((id, row.quantity)),
            None => {
                warn!(name = %row.entity.name, "Order line without item id, skipped");
                None
            }
        }));
        info!(%order_id, entries = cart.entries().len(), "Order opened for editing");
        Ok(Self {
            order,
            cart,
            context,
            menu: menu.downgrade(),
        })
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn add_entry(&mut self, item_id: MenuItemId) -> &Cart {
        self.cart = self.cart.with_entry_added(item_id);
        &self.cart
    }

    pub fn increment_quantity(&mut self, item_id: MenuItemId) -> &Cart {
        self.cart = self.cart.with_quantity_incremented(item_id);
        &self.cart
    }

    pub fn decrement_quantity(&mut self, item_id: MenuItemId) -> &Cart {
        self.cart = self.cart.with_quantity_decremented(item_id);
        &self.cart
    }

    pub async fn total_price(&self) -> Result<f64, StoreError> {
        let menu = self.menu.upgrade()?.snapshot().await?;
        Ok(self.cart.total_price(&menu))
    }

    pub async fn lines(&self) -> Result<Vec<CartLine>, StoreError> {
        let menu = self.menu.upgrade()?.snapshot().await?;
        Ok(self.cart.lines(&menu))
    }

    /// Writes the amended order and waits for the answer.
    ///
    /// On success the editor tracks the order as stored. On failure the recovery policy
    /// runs, the error is returned, and the cart keeps the edits.
    #[instrument(skip(self), fields(order_id = ?self.order.id))]
    pub async fn submit(&mut self) -> Result<Order, StoreError> {
        let menu = self.menu.upgrade()?.snapshot().await?;
        let amended = Order {
            id: self.order.id,
            price: self.cart.total_price(&menu),
            time: self.order.time,
            user_id: self.order.user_id,
            status: self.order.status.clone(),
            items: self.cart.items_map(),
        };
        match self.context.api.save_order(&amended).await {
            Ok(saved) => {
                info!(price = saved.price, units = saved.unit_count(), "Order amended");
                self.order = saved.clone();
                Ok(saved)
            }
            Err(e) => {
                self.context.report(&e);
                Err(e.into())
            }
        }
    }
}
