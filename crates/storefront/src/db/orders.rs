//! Order repository.
//!
//! Orders and their items are inserted inside the checkout transaction and
//! never updated. Reads are always scoped to the owning user.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use boutique_core::{OrderId, OrderItemId, Price, ProductId, Quantity, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderDetail, OrderItem, OrderLine};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    order_date: DateTime<Utc>,
    total_amount: Decimal,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            order_date: row.order_date,
            total_amount: Price::new(row.total_amount)
                .map_err(|e| RepositoryError::corrupt("total_amount", e))?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderLineRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    quantity: i32,
    price: Decimal,
    product_name: String,
    image_url: Option<String>,
}

impl TryFrom<OrderLineRow> for OrderLine {
    type Error = RepositoryError;

    fn try_from(row: OrderLineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            item: OrderItem {
                id: row.id,
                order_id: row.order_id,
                product_id: row.product_id,
                quantity: Quantity::new(row.quantity)
                    .map_err(|e| RepositoryError::corrupt("quantity", e))?,
                price: Price::new(row.price).map_err(|e| RepositoryError::corrupt("price", e))?,
            },
            product_name: row.product_name,
            image_url: row.image_url,
        })
    }
}

/// Repository for order reads.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order and its lines, only if it belongs to `user_id`.
    ///
    /// Line prices are the snapshot prices stored at checkout, not the
    /// current catalog prices.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    #[instrument(skip(self), fields(order_id = %order_id, user_id = %user_id))]
    pub async fn get_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<OrderDetail>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, order_date, total_amount
            FROM storefront.customer_order
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let order = Order::try_from(row)?;

        let rows: Vec<OrderLineRow> = sqlx::query_as(
            r"
            SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price,
                   p.name AS product_name, p.image_url
            FROM storefront.order_item oi
            JOIN storefront.product p ON oi.product_id = p.id
            WHERE oi.order_id = $1
            ORDER BY p.name, oi.id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        let lines = rows
            .into_iter()
            .map(OrderLine::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(OrderDetail { order, lines }))
    }

    /// List the user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, order_date, total_amount
            FROM storefront.customer_order
            WHERE user_id = $1
            ORDER BY order_date DESC, id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }
}

/// Insert an order header on the given connection.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_order(conn: &mut PgConnection, order: &Order) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO storefront.customer_order (id, user_id, order_date, total_amount)
        VALUES ($1, $2, $3, $4)
        ",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(order.order_date)
    .bind(order.total_amount)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Insert an order line on the given connection.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_item(conn: &mut PgConnection, item: &OrderItem) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO storefront.order_item (id, order_id, product_id, quantity, price)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(item.price)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
