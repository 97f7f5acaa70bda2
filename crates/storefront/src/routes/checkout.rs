//! Checkout handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::CartRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::routes::NavView;
use crate::routes::cart::CartView;
use crate::services::{CheckoutError, CheckoutService};
use crate::state::AppState;

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub action: String,
}

/// Checkout summary page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub nav: NavView,
    pub email: String,
    pub cart: CartView,
}

/// Display the order summary.
///
/// Prices shown here are live; the order records whatever the prices are
/// when it is placed.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<CheckoutTemplate> {
    let lines = CartRepository::new(state.pool()).get_items(user.id).await?;
    let nav = NavView::load(&state, Some(&user)).await?;

    Ok(CheckoutTemplate {
        nav,
        email: user.email.to_string(),
        cart: CartView::from_lines(&lines),
    })
}

/// Place the order.
///
/// Only a committed order redirects to its confirmation page. A storage
/// failure renders an error instead, and nothing was written.
#[instrument(skip(state, user, form), fields(user_id = %user.id, action = %form.action))]
pub async fn action(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    if form.action != "place_order" {
        return Ok(Redirect::to("/cart").into_response());
    }

    match CheckoutService::new(state.pool()).place_order(user.id).await {
        Ok(order_id) => {
            Ok(Redirect::to(&format!("/order-confirmation/{order_id}")).into_response())
        }
        Err(CheckoutError::EmptyCart) => {
            tracing::info!("checkout attempted with an empty cart");
            Ok(Redirect::to("/cart").into_response())
        }
        Err(err) => Err(err.into()),
    }
}
