//! Type-safe wrappers around the store's actors.

pub mod actor_client;
pub mod cart_client;
pub mod ingredient_client;
pub mod menu_item_client;

pub use actor_client::*;
pub use cart_client::*;
pub use ingredient_client::*;
pub use menu_item_client::*;
