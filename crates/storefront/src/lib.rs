//! Boutique storefront library.
//!
//! The HTTP service behind the storefront binary, exposed as a library so
//! the integration tests can drive the same router and repositories.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
