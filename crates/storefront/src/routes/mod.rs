//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                - Redirect to /products
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database)
//!
//! # Auth
//! GET  /login                           - Login / register page
//! POST /login                           - action=login | register
//! POST /logout                          - Clear the session cookie
//!
//! # Catalog
//! GET  /products                        - Product listing
//! GET  /products/{id}                   - Product detail
//!
//! # Cart (requires auth)
//! GET  /cart                            - Cart page
//! POST /cart                            - action=add | update_quantity | remove | checkout
//!
//! # Checkout (requires auth)
//! GET  /checkout                        - Order summary
//! POST /checkout                        - action=place_order
//! GET  /order-confirmation/{order_id}   - Placed order, owner only
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;

use axum::{Router, middleware as axum_middleware, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::db::CartRepository;
use crate::error::Result;
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Directory served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Navigation bar data shared by every page.
#[derive(Clone, Debug, Default)]
pub struct NavView {
    /// Email of the logged-in user, if any.
    pub email: Option<String>,
    /// Number of lines in the user's cart.
    pub cart_count: i64,
}

impl NavView {
    /// Build the nav bar for the current user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the cart count query fails.
    pub async fn load(state: &AppState, user: Option<&CurrentUser>) -> Result<Self> {
        let Some(user) = user else {
            return Ok(Self::default());
        };

        let cart_count = CartRepository::new(state.pool()).item_count(user.id).await?;
        Ok(Self {
            email: Some(user.email.to_string()),
            cart_count,
        })
    }
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(home::health))
        .route("/health/ready", get(home::readiness))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout_redirect).post(auth::logout))
        // Catalog
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        // Cart and checkout
        .route("/cart", get(cart::show).post(cart::action))
        .route("/checkout", get(checkout::show).post(checkout::action))
        .route(
            "/order-confirmation/{order_id}",
            get(orders::confirmation),
        )
}

/// Build the full application router with middleware and static files.
///
/// Sentry layers are added by the binary so tests can drive this router
/// without a Sentry client.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
