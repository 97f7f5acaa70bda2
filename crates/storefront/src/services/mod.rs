//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Account registration and password login
//! - `session` - Signed session tokens and the session cookie
//! - `checkout` - Transactional order placement from the cart

pub mod auth;
pub mod checkout;
pub mod session;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutService, OrderDraft};
pub use session::{SessionError, SessionManager};
