//! Domain models for the storefront.
//!
//! These are validated domain records, separate from the `sqlx` row types in
//! [`crate::db`]. Every entity carries typed ids from `boutique_core`.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod session;
pub mod user;

pub use cart::CartLine;
pub use catalog::{Category, Product};
pub use order::{Order, OrderDetail, OrderItem, OrderLine};
pub use session::CurrentUser;
pub use user::{User, UserCredentials};
