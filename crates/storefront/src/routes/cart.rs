//! Cart route handlers.
//!
//! Every cart form posts to `/cart` with an `action` field. Handlers always
//! act on the logged-in user's own cart; ids from the form are only ever
//! used together with that user's id.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use boutique_core::{CartItemId, ProductId, Quantity};

use crate::db::{CartRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::CartLine;
use crate::models::cart::cart_total;
use crate::routes::NavView;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone, Debug)]
pub struct CartItemView {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub quantity: i32,
    pub price: String,
    pub line_price: String,
    pub image_url: Option<String>,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.to_string(),
            product_id: line.product_id.to_string(),
            name: line.name.clone(),
            quantity: line.quantity.get(),
            price: line.unit_price.to_string(),
            line_price: line.line_total().to_string(),
            image_url: line.image_url.clone(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone, Debug)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
}

impl CartView {
    /// Build the view from cart lines at their live prices.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        Self {
            items: lines.iter().map(CartItemView::from).collect(),
            total: cart_total(lines).to_string(),
        }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart form data. Which fields are required depends on `action`.
#[derive(Debug, Deserialize)]
pub struct CartForm {
    pub action: String,
    pub product_id: Option<String>,
    pub quantity: Option<String>,
    pub cart_item_id: Option<String>,
    pub new_quantity: Option<String>,
}

/// The parsed cart action.
#[derive(Debug, PartialEq, Eq)]
pub enum CartAction {
    Add {
        product_id: ProductId,
        quantity: Quantity,
    },
    UpdateQuantity {
        cart_item_id: CartItemId,
        new_quantity: i64,
    },
    Remove {
        cart_item_id: CartItemId,
    },
    Checkout,
    Other,
}

impl CartAction {
    /// Parse and validate the form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for a product id that is not a UUID and
    /// `AppError::BadRequest` for other malformed fields.
    pub fn parse(form: &CartForm) -> Result<Self> {
        match form.action.as_str() {
            "add" => {
                let product_id = form
                    .product_id
                    .as_deref()
                    .and_then(|id| id.parse().ok())
                    .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
                // Quantity defaults to one and is clamped to at least one.
                let requested = match form.quantity.as_deref().map(str::trim) {
                    None | Some("") => 1,
                    Some(raw) => parse_int(raw)?,
                };
                let quantity = Quantity::from_i64(requested.max(1))
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                Ok(Self::Add {
                    product_id,
                    quantity,
                })
            }
            "update_quantity" => Ok(Self::UpdateQuantity {
                cart_item_id: parse_cart_item_id(form.cart_item_id.as_deref())?,
                new_quantity: parse_int(form.new_quantity.as_deref().unwrap_or("").trim())?,
            }),
            "remove" => Ok(Self::Remove {
                cart_item_id: parse_cart_item_id(form.cart_item_id.as_deref())?,
            }),
            "checkout" => Ok(Self::Checkout),
            _ => Ok(Self::Other),
        }
    }
}

fn parse_int(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Quantity must be a whole number".to_string()))
}

fn parse_cart_item_id(raw: Option<&str>) -> Result<CartItemId> {
    raw.and_then(|id| id.parse().ok())
        .ok_or_else(|| AppError::BadRequest("Missing or invalid cart item".to_string()))
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: NavView,
    pub cart: CartView,
}

/// Display cart page.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<CartShowTemplate> {
    let lines = CartRepository::new(state.pool()).get_items(user.id).await?;
    let nav = NavView::load(&state, Some(&user)).await?;

    Ok(CartShowTemplate {
        nav,
        cart: CartView::from_lines(&lines),
    })
}

/// Handle a cart form submission.
#[instrument(skip(state, user, form), fields(user_id = %user.id, action = %form.action))]
pub async fn action(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CartForm>,
) -> Result<Response> {
    let cart = CartRepository::new(state.pool());

    match CartAction::parse(&form)? {
        CartAction::Add {
            product_id,
            quantity,
        } => {
            cart.add_item(user.id, product_id, quantity)
                .await
                .map_err(|e| match e {
                    RepositoryError::NotFound => {
                        AppError::NotFound("Product not found".to_string())
                    }
                    other => AppError::Database(other),
                })?;
        }
        CartAction::UpdateQuantity {
            cart_item_id,
            new_quantity,
        } => {
            let changed = cart
                .update_quantity(user.id, cart_item_id, new_quantity)
                .await
                .map_err(|e| match e {
                    RepositoryError::Conflict(msg) => AppError::BadRequest(msg),
                    other => AppError::Database(other),
                })?;
            if !changed {
                tracing::debug!(cart_item_id = %cart_item_id, "update matched no cart line");
            }
        }
        CartAction::Remove { cart_item_id } => {
            if !cart.remove_item(user.id, cart_item_id).await? {
                tracing::debug!(cart_item_id = %cart_item_id, "remove matched no cart line");
            }
        }
        CartAction::Checkout => return Ok(Redirect::to("/checkout").into_response()),
        CartAction::Other => {}
    }

    Ok(Redirect::to("/cart").into_response())
}
