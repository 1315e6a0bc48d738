//! Row shapes returned by the analytic report endpoints and the link endpoints.

use crate::model::Ingredient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive date window sent as `startDate` / `endDate` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("startDate", crate::model::time::to_iso(&self.start)),
            ("endDate", crate::model::time::to_iso(&self.end)),
        ]
    }
}

/// `/salesReport`: how many orders contained each item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRow {
    pub item_name: String,
    pub order_count: i64,
}

/// `/ingredientUsageReport`: ingredient consumption in the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientUsageRow {
    pub ingredient_name: String,
    pub amount_used: i64,
}

/// `/orderedTogether`: pairs of items that appear in the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedTogetherRow {
    pub item1_name: String,
    pub item2_name: String,
    pub pair_count: i64,
}

/// `/restockReport`: an ingredient below its threshold and the amount to order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockRow {
    pub ingredient: Ingredient,
    pub restock_amount: i64,
}

/// An entity joined with a quantity, as returned by `/itemToIngredient` and `/itemToOrder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithQuantity<T> {
    #[serde(flatten)]
    pub entity: T,
    pub quantity: u32,
}
