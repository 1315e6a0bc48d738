use crate::framework::FrameworkError;
use crate::model::MenuItemId;
use crate::store::cart_actor::{CartRequest, CheckoutReceipt};
use crate::store::{Cart, StoreError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Client for the live cart actor.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> CartRequest,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        Ok(response.await.map_err(|_| FrameworkError::ActorDropped)??)
    }

    #[instrument(skip(self))]
    pub async fn add_entry(&self, item_id: MenuItemId) -> Result<Cart, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| CartRequest::AddEntry {
            item_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn increment_quantity(&self, item_id: MenuItemId) -> Result<Cart, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| CartRequest::Increment {
            item_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn decrement_quantity(&self, item_id: MenuItemId) -> Result<Cart, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| CartRequest::Decrement {
            item_id,
            respond_to,
        })
        .await
    }

    pub async fn snapshot(&self) -> Result<Cart, StoreError> {
        self.request(|respond_to| CartRequest::Snapshot { respond_to })
            .await
    }

    /// Total against the currently cached menu.
    pub async fn total_price(&self) -> Result<f64, StoreError> {
        self.request(|respond_to| CartRequest::TotalPrice { respond_to })
            .await
    }

    /// Submits the cart as a new order and empties it, without waiting for the backend.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<CheckoutReceipt, StoreError> {
        debug!("Sending request");
        self.request(|respond_to| CartRequest::Checkout { respond_to })
            .await
    }
}
