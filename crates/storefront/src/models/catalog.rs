//! Catalog records. Read-only from the storefront's point of view.

use boutique_core::{CategoryId, Price, ProductId};
use serde::Serialize;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A product as currently listed in the catalog.
///
/// `price` is the live price. Orders keep their own copy of the price at
/// checkout time, so later changes here never touch placed orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub category_id: Option<CategoryId>,
    pub image_url: Option<String>,
}
