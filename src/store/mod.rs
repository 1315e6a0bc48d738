//! The order draft: the live cart, the cached reference data and the order editor.

pub mod cart;
pub mod cart_actor;
pub mod error;
pub mod order_edit;
pub mod reference;

pub use cart::{Cart, CartEntry, CartLine};
pub use cart_actor::{CartActor, CartContext, CheckoutReceipt};
pub use error::StoreError;
pub use order_edit::OrderEditor;
pub use reference::{menu_by_category, CategoryTab, DraftSnapshot};
