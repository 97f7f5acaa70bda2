//! Cart line records.

use boutique_core::{CartItemId, Price, ProductId, Quantity};

/// One cart row joined with the product's current name, price, and image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub name: String,
    /// Live catalog price at the time the cart was read.
    pub unit_price: Price,
    pub image_url: Option<String>,
}

impl CartLine {
    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Total of a set of cart lines at their live prices.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::line_total).sum()
}
