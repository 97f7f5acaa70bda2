//! Order records. Written once at checkout, immutable afterwards.

use chrono::{DateTime, Utc};

use boutique_core::{OrderId, OrderItemId, Price, ProductId, Quantity, UserId};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub order_date: DateTime<Utc>,
    pub total_amount: Price,
}

/// A persisted order line with its snapshot unit price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub price: Price,
}

/// An order line joined with product display data for the confirmation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub item: OrderItem,
    pub product_name: String,
    pub image_url: Option<String>,
}

impl OrderLine {
    /// Snapshot price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.item.price.times(self.item.quantity)
    }
}

/// An order with all of its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetail {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}
