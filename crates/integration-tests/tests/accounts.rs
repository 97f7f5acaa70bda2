//! Account registration and login tests against `PostgreSQL`.

#![allow(clippy::unwrap_used)]

mod common;

use boutique_storefront::services::{AuthError, AuthService};
use sqlx::PgPool;

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_register_then_login(pool: PgPool) {
    let auth = AuthService::new(&pool);
    let registered = auth
        .register("Shopper@Example.com", common::PASSWORD)
        .await
        .unwrap();
    assert_eq!(registered.email.as_str(), "shopper@example.com");

    let logged_in = auth
        .login("shopper@example.com", common::PASSWORD)
        .await
        .unwrap();
    assert_eq!(logged_in.id, registered.id);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_email_is_rejected(pool: PgPool) {
    let auth = AuthService::new(&pool);
    auth.register("dup@example.com", common::PASSWORD)
        .await
        .unwrap();

    let result = auth.register("DUP@example.com", "another password").await;
    assert!(matches!(result, Err(AuthError::UserAlreadyExists)));
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_wrong_password_and_unknown_email_look_the_same(pool: PgPool) {
    let auth = AuthService::new(&pool);
    auth.register("known@example.com", common::PASSWORD)
        .await
        .unwrap();

    let wrong = auth.login("known@example.com", "not the password").await;
    let unknown = auth.login("nobody@example.com", common::PASSWORD).await;

    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
    assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_find_by_email(pool: PgPool) {
    let auth = AuthService::new(&pool);
    let id = common::register(&pool, "findme@example.com").await;

    let found = auth.find_by_email("findme@example.com").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(id));
    assert!(auth.find_by_email("missing@example.com").await.unwrap().is_none());
}
