//! The actor owning the live cart.
//!
//! Each request replaces the cart with a new [`Cart`] value in one step, so concurrent
//! callers can never observe or produce a half-applied change.

use crate::api::ApiError;
use crate::clients::CartClient;
use crate::framework::{BackendContext, CacheClient, FrameworkError, Response};
use crate::model::{MenuItem, MenuItemId, Order, UserId};
use crate::store::{Cart, StoreError};
use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum CartRequest {
    AddEntry {
        item_id: MenuItemId,
        respond_to: Response<Cart>,
    },
    Increment {
        item_id: MenuItemId,
        respond_to: Response<Cart>,
    },
    Decrement {
        item_id: MenuItemId,
        respond_to: Response<Cart>,
    },
    Snapshot {
        respond_to: Response<Cart>,
    },
    TotalPrice {
        respond_to: Response<f64>,
    },
    Checkout {
        respond_to: Response<CheckoutReceipt>,
    },
}

/// What `checkout` hands back: the order as submitted and a way to learn its fate.
///
/// Dropping the receipt does not cancel the submission.
#[derive(Debug)]
pub struct CheckoutReceipt {
    pub order: Order,
    outcome: oneshot::Receiver<Result<Order, ApiError>>,
}

impl CheckoutReceipt {
    /// Waits for the backend's answer. The cart was cleared either way.
    pub async fn outcome(self) -> Result<Order, StoreError> {
        let result = self
            .outcome
            .await
            .map_err(|_| StoreError::ActorCommunication(FrameworkError::ActorDropped))?;
        Ok(result?)
    }
}

/// Dependencies of the cart actor: the backend, and the menu to price against.
#[derive(Clone)]
pub struct CartContext {
    pub backend: BackendContext,
    pub menu: CacheClient<MenuItem>,
}

pub struct CartActor {
    receiver: mpsc::Receiver<CartRequest>,
    cart: Cart,
    submissions: JoinSet<()>,
}

impl CartActor {
    pub fn new(buffer_size: usize) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            cart: Cart::new(),
            submissions: JoinSet::new(),
        };
        (actor, CartClient::new(sender))
    }

    /// Runs until every client is gone, then waits for in-flight submissions.
    pub async fn run(mut self, context: CartContext) {
        info!("Cart actor started");
        loop {
            tokio::select! {
                request = self.receiver.recv() => match request {
                    Some(request) => self.handle(request, &context).await,
                    None => break,
                },
                Some(joined) = self.submissions.join_next(), if !self.submissions.is_empty() => {
                    if let Err(e) = joined {
                        warn!(error = %e, "Order submission task failed");
                    }
                }
            }
        }

        debug!(in_flight = self.submissions.len(), "Draining submissions");
        while let Some(joined) = self.submissions.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Order submission task failed");
            }
        }
        info!(entries = self.cart.entries().len(), "Cart actor shutdown");
    }

    async fn handle(&mut self, request: CartRequest, context: &CartContext) {
        match request {
            CartRequest::AddEntry {
                item_id,
                respond_to,
            } => {
                self.cart = self.cart.with_entry_added(item_id);
                debug!(%item_id, quantity = self.cart.quantity_of(item_id), "Entry added");
                let _ = respond_to.send(Ok(self.cart.clone()));
            }
            CartRequest::Increment {
                item_id,
                respond_to,
            } => {
                self.cart = self.cart.with_quantity_incremented(item_id);
                debug!(%item_id, quantity = self.cart.quantity_of(item_id), "Incremented");
                let _ = respond_to.send(Ok(self.cart.clone()));
            }
            CartRequest::Decrement {
                item_id,
                respond_to,
            } => {
                self.cart = self.cart.with_quantity_decremented(item_id);
                debug!(%item_id, quantity = self.cart.quantity_of(item_id), "Decremented");
                let _ = respond_to.send(Ok(self.cart.clone()));
            }
            CartRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(Ok(self.cart.clone()));
            }
            CartRequest::TotalPrice { respond_to } => {
                let menu = Self::menu(context).await;
                let _ = respond_to.send(Ok(self.cart.total_price(&menu)));
            }
            CartRequest::Checkout { respond_to } => {
                let menu = Self::menu(context).await;
                let order = self.cart.draft_order(&menu, Utc::now(), UserId::WALK_IN);
                self.cart = Cart::new();
                if order.items.is_empty() {
                    debug!("Submitting an empty order");
                }
                info!(units = order.unit_count(), price = order.price, "Checkout");

                let (report_to, outcome) = oneshot::channel();
                let backend = context.backend.clone();
                let submitted = order.clone();
                self.submissions.spawn(async move {
                    let result = backend.api.save_order(&submitted).await;
                    match &result {
                        Ok(saved) => info!(order_id = ?saved.id, "Order placed"),
                        Err(e) => {
                            backend.report(e);
                        }
                    }
                    let _ = report_to.send(result);
                });
                let _ = respond_to.send(Ok(CheckoutReceipt { order, outcome }));
            }
        }
    }

    /// The cached menu, or an empty one if the menu actor is gone.
    async fn menu(context: &CartContext) -> Vec<MenuItem> {
        match context.menu.snapshot().await {
            Ok(menu) => menu,
            Err(e) => {
                warn!(error = %e, "Menu unavailable, pricing at zero");
                Vec::new()
            }
        }
    }
}
