//! Type-safe identifiers for backend entities.
//!
//! Every id is a thin newtype over the backend's `int` primary key. They serialize
//! transparently, so they can be used both as JSON values and as JSON object keys
//! (the `items` map of an [`Order`](crate::model::Order) is keyed by [`MenuItemId`]).

use serde::{Deserialize, Serialize};
use std::fmt::Display;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`MenuItem`](crate::model::MenuItem).
    MenuItemId,
    "item"
);
entity_id!(
    /// Identifier of an [`Ingredient`](crate::model::Ingredient).
    IngredientId,
    "ingredient"
);
entity_id!(
    /// Identifier of an [`ItemCategory`](crate::model::ItemCategory).
    CategoryId,
    "category"
);
entity_id!(
    /// Identifier of an [`Order`](crate::model::Order).
    OrderId,
    "order"
);
entity_id!(
    /// Identifier of a [`User`](crate::model::User).
    UserId,
    "user"
);

impl UserId {
    /// Placeholder user attached to orders placed from the customer kiosk.
    pub const WALK_IN: UserId = UserId(0);
}
