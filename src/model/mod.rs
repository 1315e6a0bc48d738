//! Pure data structures (DTOs) exchanged with the backend.
//!
//! Field names follow the backend's camelCase JSON. The cart types live in
//! [`store::cart`](crate::store::cart) because they never leave the client.

pub mod ids;
pub mod ingredient;
pub mod menu;
pub mod order;
pub mod report;
pub mod time;
pub mod user;

pub use ids::*;
pub use ingredient::*;
pub use menu::*;
pub use order::*;
pub use report::*;
pub use user::*;
