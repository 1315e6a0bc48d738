use crate::api::backend::{Backend, Query};
use crate::api::ApiError;
use crate::model::{
    Ingredient, IngredientUsageRow, ItemCategory, LoginInfo, MenuItem, MenuItemId,
    Order, OrderId, OrderedTogetherRow, ReportRange, RestockRow, SalesRow, User, UserId,
    WithQuantity,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Typed access to every backend endpoint.
///
/// Cloning is cheap; all clones share the same [`Backend`].
#[derive(Clone)]
pub struct ApiClient {
    backend: Arc<dyn Backend>,
}

impl ApiClient {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// GET a JSON array. A `null` body is read as an empty list.
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> Result<Vec<T>, ApiError> {
        let value = self.backend.get_json(path, query).await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        let rows: Vec<T> = serde_json::from_value(value)?;
        debug!(path, size = rows.len(), "Fetched rows");
        Ok(rows)
    }

    /// POST an entity and read back what the backend stored.
    pub async fn save<T: Serialize + DeserializeOwned>(
        &self,
        path: &str,
        entity: &T,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(entity)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let value = self.backend.post_json(path, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// DELETE by the `id` query parameter.
    pub async fn remove(&self, path: &str, id: i32) -> Result<(), ApiError> {
        self.backend.delete(path, &[("id", id.to_string())]).await
    }

    // Reference data. Writes to menu items and ingredients go through their cache actors.

    #[instrument(skip(self))]
    pub async fn menu_items(&self) -> Result<Vec<MenuItem>, ApiError> {
        self.list("/menuItems", &[]).await
    }

    #[instrument(skip(self))]
    pub async fn item_categories(&self) -> Result<Vec<ItemCategory>, ApiError> {
        self.list("/itemCategories", &[]).await
    }

    #[instrument(skip(self))]
    pub async fn ingredients(&self) -> Result<Vec<Ingredient>, ApiError> {
        self.list("/ingredients", &[]).await
    }

    // Orders and links

    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.list("/orders", &[]).await
    }

    #[instrument(skip(self, order), fields(order_id = ?order.id, units = order.unit_count()))]
    pub async fn save_order(&self, order: &Order) -> Result<Order, ApiError> {
        self.save("/orders", order).await
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), ApiError> {
        self.remove("/orders", id.into()).await
    }

    /// Ingredients of one menu item with the amount each serving uses.
    #[instrument(skip(self))]
    pub async fn item_ingredients(
        &self,
        item_id: MenuItemId,
    ) -> Result<Vec<WithQuantity<Ingredient>>, ApiError> {
        self.list("/itemToIngredient", &[("itemId", item_id.0.to_string())])
            .await
    }

    /// Items of one order with their quantities.
    #[instrument(skip(self))]
    pub async fn order_items(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<WithQuantity<MenuItem>>, ApiError> {
        self.list("/itemToOrder", &[("orderId", order_id.0.to_string())])
            .await
    }

    // Users

    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.list("/users", &[]).await
    }

    #[instrument(skip(self, user), fields(user_id = ?user.id, role = %user.role))]
    pub async fn save_user(&self, user: &User) -> Result<User, ApiError> {
        self.save("/users", user).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.remove("/users", id.into()).await
    }

    // Reports

    #[instrument(skip(self))]
    pub async fn sales_report(&self, range: ReportRange) -> Result<Vec<SalesRow>, ApiError> {
        self.list("/salesReport", &range.query()).await
    }

    #[instrument(skip(self))]
    pub async fn ingredient_usage_report(
        &self,
        range: ReportRange,
    ) -> Result<Vec<IngredientUsageRow>, ApiError> {
        self.list("/ingredientUsageReport", &range.query()).await
    }

    /// Items that sold poorly relative to their stock in the window.
    #[instrument(skip(self))]
    pub async fn excess_items(&self, range: ReportRange) -> Result<Vec<MenuItem>, ApiError> {
        self.list("/excessItems", &range.query()).await
    }

    #[instrument(skip(self))]
    pub async fn restock_report(&self, range: ReportRange) -> Result<Vec<RestockRow>, ApiError> {
        self.list("/restockReport", &range.query()).await
    }

    #[instrument(skip(self))]
    pub async fn ordered_together(
        &self,
        range: ReportRange,
    ) -> Result<Vec<OrderedTogetherRow>, ApiError> {
        self.list("/orderedTogether", &range.query()).await
    }

    // Authentication

    /// Who the backend thinks the bearer of the current credential is.
    #[instrument(skip(self))]
    pub async fn login_info(&self) -> Result<LoginInfo, ApiError> {
        let value = self.backend.get_json("/auth/login", &[]).await?;
        if value == Value::Null {
            return Ok(LoginInfo::default());
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[tokio::test]
    async fn test_report_sends_date_window() {
        let mock = Arc::new(MockBackend::new());
        mock.expect_get("/restockReport")
            .with_query(&[
                ("startDate", "2024-03-01T00:00:00.000Z"),
                ("endDate", "2024-03-31T00:00:00.000Z"),
            ])
            .return_ok(json!([{
                "ingredient": {"id": 3, "name": "Rice", "stock": 2, "restock": 20},
                "restockAmount": 18
            }]));

        let api = ApiClient::new(mock.clone());
        let range = ReportRange::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(),
        );
        let rows = api.restock_report(range).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ingredient.name, "Rice");
        assert_eq!(rows[0].restock_amount, 18);
        mock.verify();
    }

    #[tokio::test]
    async fn test_delete_passes_id_as_query() {
        let mock = Arc::new(MockBackend::new());
        mock.expect_delete("/users")
            .with_query(&[("id", "12")])
            .return_ok(Value::Null);

        let api = ApiClient::new(mock.clone());
        api.delete_user(UserId(12)).await.unwrap();
        mock.verify();
    }

    #[tokio::test]
    async fn test_null_list_is_empty() {
        let mock = Arc::new(MockBackend::new());
        mock.expect_get("/orders").return_ok(Value::Null);

        let api = ApiClient::new(mock.clone());
        assert!(api.orders().await.unwrap().is_empty());
        mock.verify();
    }

    #[tokio::test]
    async fn test_login_info() {
        let mock = Arc::new(MockBackend::new());
        mock.expect_get("/auth/login")
            .return_ok(json!({"user": "sam@example.com", "role": "ROLE_manager"}));

        let api = ApiClient::new(mock.clone());
        let info = api.login_info().await.unwrap();
        assert_eq!(info.user, "sam@example.com");
        assert_eq!(info.role, "ROLE_manager");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mock = Arc::new(MockBackend::new());
        mock.expect_get("/menuItems").return_ok(json!({"unexpected": true}));

        let api = ApiClient::new(mock.clone());
        assert!(matches!(api.menu_items().await, Err(ApiError::Decode(_))));
    }
}
