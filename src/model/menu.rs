use crate::model::{CategoryId, IngredientId, MenuItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dish or drink offered on the menu.
///
/// # Caching
/// Menu items are owned by the backend. The client keeps a read/write copy in a
/// [`CacheActor`](crate::framework::CacheActor) (see [`MenuItemClient`](crate::clients::MenuItemClient)).
///
/// `ingredients` maps an ingredient to the amount one serving consumes. The backend accepts
/// it on writes but never sends it back, so it is empty on freshly fetched items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MenuItemId>,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub gluten_free: bool,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub extra_sauce: bool,
    #[serde(default)]
    pub ingredients: BTreeMap<IngredientId, u32>,
}

impl MenuItem {
    /// Creates a menu item without an id; the backend assigns one on save.
    pub fn new(name: impl Into<String>, price: f64, category_id: CategoryId) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            image_url: String::new(),
            category_id,
            vegan: false,
            gluten_free: false,
            size: String::new(),
            extra_sauce: false,
            ingredients: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: MenuItemId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Groups menu items for tabbed display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    pub name: String,
}

impl ItemCategory {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }
}
