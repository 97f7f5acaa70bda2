//! Cart repository.
//!
//! Every statement filters on the owning `user_id` as well as the target id,
//! so one account can never read or change another account's cart. Each
//! mutation is a single statement; concurrent updates to the same line
//! resolve to whichever statement the database applies last.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use tracing::instrument;

use boutique_core::{CartItemId, Price, ProductId, Quantity, UserId};

use super::{RepositoryError, is_foreign_key_violation};
use crate::models::CartLine;

const CART_LINES_SQL: &str = r"
    SELECT ci.id, ci.product_id, ci.quantity, p.name, p.price, p.image_url
    FROM storefront.cart_item ci
    JOIN storefront.product p ON ci.product_id = p.id
    WHERE ci.user_id = $1
    ORDER BY ci.created_at, ci.id
";

const CART_LINES_FOR_UPDATE_SQL: &str = r"
    SELECT ci.id, ci.product_id, ci.quantity, p.name, p.price, p.image_url
    FROM storefront.cart_item ci
    JOIN storefront.product p ON ci.product_id = p.id
    WHERE ci.user_id = $1
    ORDER BY ci.created_at, ci.id
    FOR UPDATE OF ci
";

#[derive(sqlx::FromRow)]
struct CartLineRow {
    id: CartItemId,
    product_id: ProductId,
    quantity: i32,
    name: String,
    price: Decimal,
    image_url: Option<String>,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            quantity: Quantity::new(row.quantity)
                .map_err(|e| RepositoryError::corrupt("quantity", e))?,
            name: row.name,
            unit_price: Price::new(row.price).map_err(|e| RepositoryError::corrupt("price", e))?,
            image_url: row.image_url,
        })
    }
}

fn into_lines(rows: Vec<CartLineRow>) -> Result<Vec<CartLine>, RepositoryError> {
    rows.into_iter().map(CartLine::try_from).collect()
}

/// Repository for cart operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart lines joined with live product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_items(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows: Vec<CartLineRow> = sqlx::query_as(CART_LINES_SQL)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        into_lines(rows)
    }

    /// Number of distinct lines in the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn item_count(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM storefront.cart_item
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Add `quantity` units of a product to the cart.
    ///
    /// If the product is already in the cart its quantity is incremented in
    /// the same statement, so two concurrent adds both count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(
        skip(self),
        fields(user_id = %user_id, product_id = %product_id, quantity = %quantity)
    )]
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartItemId, RepositoryError> {
        let id: CartItemId = sqlx::query_scalar(
            r"
            INSERT INTO storefront.cart_item (id, user_id, product_id, quantity)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = storefront.cart_item.quantity + EXCLUDED.quantity
            RETURNING id
            ",
        )
        .bind(CartItemId::new())
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(id)
    }

    /// Set a line's quantity exactly. Zero or negative removes the line.
    ///
    /// # Returns
    ///
    /// Returns `true` if a line owned by `user_id` was changed or removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(user_id = %user_id, cart_item_id = %item_id))]
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        new_quantity: i64,
    ) -> Result<bool, RepositoryError> {
        let Ok(quantity) = Quantity::from_i64(new_quantity) else {
            if new_quantity <= 0 {
                return self.remove_item(user_id, item_id).await;
            }
            return Err(RepositoryError::Conflict(format!(
                "quantity {new_quantity} is out of range"
            )));
        };

        let result = sqlx::query(
            r"
            UPDATE storefront.cart_item
            SET quantity = $1
            WHERE id = $2 AND user_id = $3
            ",
        )
        .bind(quantity)
        .bind(item_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a line from the user's cart.
    ///
    /// # Returns
    ///
    /// Returns `true` if the line existed and belonged to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(user_id = %user_id, cart_item_id = %item_id))]
    pub async fn remove_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM storefront.cart_item
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(item_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every line from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM storefront.cart_item
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Read the user's cart inside a transaction, locking its rows.
///
/// Changes to the returned lines block until the transaction ends. Lines
/// inserted meanwhile are not locked, so callers remove exactly the ids they
/// read with [`remove_lines`].
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
/// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
pub async fn lock_items(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Vec<CartLine>, RepositoryError> {
    let rows: Vec<CartLineRow> = sqlx::query_as(CART_LINES_FOR_UPDATE_SQL)
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

    into_lines(rows)
}

/// Delete the given lines from a user's cart on the given connection.
///
/// Lines added after `ids` were read are left in place.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn remove_lines(
    conn: &mut PgConnection,
    user_id: UserId,
    ids: &[CartItemId],
) -> Result<u64, RepositoryError> {
    let ids: Vec<Uuid> = ids.iter().map(CartItemId::as_uuid).collect();
    let result = sqlx::query(
        r"
        DELETE FROM storefront.cart_item
        WHERE user_id = $1 AND id = ANY($2)
        ",
    )
    .bind(user_id)
    .bind(ids)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
