//! Integration tests for Boutique.
//!
//! # Running Tests
//!
//! The tests need a `PostgreSQL` server. `sqlx::test` creates a fresh
//! database per test from `DATABASE_URL` and applies the storefront
//! migrations to it.
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/boutique cargo test -p boutique-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `accounts` - Registration and login against the database
//! - `catalog` - Product and category listings
//! - `cart` - Cart merging, updates, and ownership
//! - `checkout` - Order placement, snapshots, and concurrency
//! - `http` - Full request flows through the storefront router
