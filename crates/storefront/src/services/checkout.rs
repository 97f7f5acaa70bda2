//! Order placement.
//!
//! Turns the user's cart into an order inside one database transaction:
//! lock and read the cart, insert the order and every line, remove the lines
//! that were ordered, commit. A line added while the order is being placed
//! stays in the cart. Any failure drops the transaction, which rolls it back, so a
//! half-written order is never visible.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use boutique_core::{OrderId, OrderItemId, Price, UserId};

use crate::db::{RepositoryError, cart, orders};
use crate::models::{CartLine, Order, OrderItem};

/// Errors from placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines; no order is created.
    #[error("cart is empty")]
    EmptyCart,

    /// Repository/database error. Nothing was committed.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// An order ready to be written: header plus lines with snapshot prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl OrderDraft {
    /// Build an order from cart lines read at `now`.
    ///
    /// Each line's unit price is copied as-is, and the total is the sum of
    /// those same copied prices times quantities, so the order always agrees
    /// with its own lines.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if `lines` is empty.
    pub fn from_lines(
        user_id: UserId,
        lines: &[CartLine],
        now: DateTime<Utc>,
    ) -> Result<Self, CheckoutError> {
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order_id = OrderId::new();
        let items: Vec<OrderItem> = lines
            .iter()
            .map(|line| OrderItem {
                id: OrderItemId::new(),
                order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.unit_price,
            })
            .collect();

        let total_amount: Price = items.iter().map(|i| i.price.times(i.quantity)).sum();

        Ok(Self {
            order: Order {
                id: order_id,
                user_id,
                order_date: now,
                total_amount,
            },
            items,
        })
    }
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order for everything in the user's cart.
    ///
    /// Not idempotent: a second call after success sees an empty cart and
    /// fails with `EmptyCart`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    /// Returns `CheckoutError::Repository` if any read or write fails; in
    /// that case nothing was committed.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn place_order(&self, user_id: UserId) -> Result<OrderId, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        let lines = cart::lock_items(&mut tx, user_id).await?;
        let draft = OrderDraft::from_lines(user_id, &lines, Utc::now())?;

        orders::insert_order(&mut tx, &draft.order).await?;
        for item in &draft.items {
            orders::insert_item(&mut tx, item).await?;
        }
        let ordered: Vec<_> = lines.iter().map(|line| line.id).collect();
        cart::remove_lines(&mut tx, user_id, &ordered).await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %draft.order.id,
            total = %draft.order.total_amount,
            lines = draft.items.len(),
            "order placed"
        );

        Ok(draft.order.id)
    }
}
