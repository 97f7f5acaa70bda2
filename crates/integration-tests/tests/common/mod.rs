//! Shared fixtures for the database-backed tests.

#![allow(dead_code, clippy::unwrap_used)]

use boutique_core::{Price, ProductId, UserId};
use boutique_storefront::config::StorefrontConfig;
use boutique_storefront::services::AuthService;
use secrecy::SecretString;
use sqlx::PgPool;

pub const PASSWORD: &str = "correct horse battery";

/// Insert a product with no category and return its id.
pub async fn insert_product(pool: &PgPool, name: &str, cents: i64) -> ProductId {
    let id = ProductId::new();
    sqlx::query(
        r"
        INSERT INTO storefront.product (id, name, description, price)
        VALUES ($1, $2, NULL, $3)
        ",
    )
    .bind(id)
    .bind(name)
    .bind(Price::from_cents(cents).unwrap())
    .execute(pool)
    .await
    .unwrap();
    id
}

/// Change a product's catalog price.
pub async fn set_price(pool: &PgPool, id: ProductId, cents: i64) {
    sqlx::query("UPDATE storefront.product SET price = $1 WHERE id = $2")
        .bind(Price::from_cents(cents).unwrap())
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}

/// Register a user through the auth service.
pub async fn register(pool: &PgPool, email: &str) -> UserId {
    AuthService::new(pool)
        .register(email, PASSWORD)
        .await
        .unwrap()
        .id
}

pub async fn count_orders(pool: &PgPool, user_id: UserId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM storefront.customer_order WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Configuration for driving the router in-process.
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/boutique_test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_owned(),
        session_secret: SecretString::from("kT9#vQ2$mW7!pL4@xZ8&nB3*cF6^hJ1%"),
        session_ttl_hours: 24,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}
