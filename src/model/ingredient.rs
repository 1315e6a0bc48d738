use crate::model::IngredientId;
use serde::{Deserialize, Serialize};

/// A stocked ingredient.
///
/// `restock` is the threshold below which the ingredient shows up in the restock report;
/// `amount_ordered` is what is already on order with suppliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IngredientId>,
    pub name: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub restock: i32,
    #[serde(default)]
    pub amount_ordered: i32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub gluten_free: bool,
    #[serde(default)]
    pub vegan: bool,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, stock: i32, restock: i32, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            stock,
            restock,
            amount_ordered: 0,
            price,
            gluten_free: false,
            vegan: false,
        }
    }

    pub fn with_id(mut self, id: IngredientId) -> Self {
        self.id = Some(id);
        self
    }

    /// Whether stock has fallen below the restock threshold.
    pub fn needs_restock(&self) -> bool {
        self.stock < self.restock
    }
}
