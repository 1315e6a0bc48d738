use crate::model::{MenuItemId, OrderId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A submitted (or about to be submitted) customer order.
///
/// `id` is absent until the backend has persisted the order. `items` is write-only on the
/// backend: it is sent on save and populated server-side into item/order links, which are
/// read back through `/itemToOrder` (see [`ApiClient::order_items`](crate::api::ApiClient::order_items)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    pub price: f64,
    #[serde(with = "crate::model::time")]
    pub time: DateTime<Utc>,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub items: BTreeMap<MenuItemId, u32>,
}

impl Order {
    /// Total number of units across all lines.
    pub fn unit_count(&self) -> u32 {
        self.items.values().sum()
    }
}
