//! Cart repository tests against `PostgreSQL`.

#![allow(clippy::unwrap_used)]

mod common;

use boutique_core::{Price, ProductId, Quantity};
use boutique_storefront::db::{CartRepository, RepositoryError};
use boutique_storefront::models::cart::cart_total;
use sqlx::PgPool;

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_adding_same_product_merges_lines(pool: PgPool) {
    let user = common::register(&pool, "merge@example.com").await;
    let product = common::insert_product(&pool, "Casual T-Shirt", 2999).await;
    let cart = CartRepository::new(&pool);

    let first = cart.add_item(user, product, Quantity::ONE).await.unwrap();
    let second = cart
        .add_item(user, product, Quantity::new(2).unwrap())
        .await
        .unwrap();

    assert_eq!(first, second);
    let lines = cart.get_items(user).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity.get(), 3);
    assert_eq!(cart_total(&lines), Price::from_cents(8997).unwrap());
    assert_eq!(cart.item_count(user).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_concurrent_adds_both_count(pool: PgPool) {
    let user = common::register(&pool, "race@example.com").await;
    let product = common::insert_product(&pool, "Slim Fit Jeans", 7999).await;
    let cart = CartRepository::new(&pool);

    let (a, b) = tokio::join!(
        cart.add_item(user, product, Quantity::ONE),
        cart.add_item(user, product, Quantity::ONE),
    );
    a.unwrap();
    b.unwrap();

    let lines = cart.get_items(user).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity.get(), 2);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_adding_unknown_product_is_not_found(pool: PgPool) {
    let user = common::register(&pool, "ghost@example.com").await;
    let result = CartRepository::new(&pool)
        .add_item(user, ProductId::new(), Quantity::ONE)
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_update_quantity_sets_exact_value(pool: PgPool) {
    let user = common::register(&pool, "update@example.com").await;
    let product = common::insert_product(&pool, "Elegant Maxi Dress", 12999).await;
    let cart = CartRepository::new(&pool);
    let item = cart.add_item(user, product, Quantity::ONE).await.unwrap();

    assert!(cart.update_quantity(user, item, 5).await.unwrap());

    let lines = cart.get_items(user).await.unwrap();
    assert_eq!(lines[0].quantity.get(), 5);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_update_to_zero_or_negative_removes_line(pool: PgPool) {
    let user = common::register(&pool, "zero@example.com").await;
    let cart = CartRepository::new(&pool);
    let a = common::insert_product(&pool, "A", 100).await;
    let b = common::insert_product(&pool, "B", 100).await;
    let item_a = cart.add_item(user, a, Quantity::ONE).await.unwrap();
    let item_b = cart.add_item(user, b, Quantity::ONE).await.unwrap();

    assert!(cart.update_quantity(user, item_a, 0).await.unwrap());
    assert!(cart.update_quantity(user, item_b, -3).await.unwrap());

    assert!(cart.get_items(user).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_update_after_remove_is_a_no_op(pool: PgPool) {
    let user = common::register(&pool, "stale@example.com").await;
    let product = common::insert_product(&pool, "Scarf", 1500).await;
    let cart = CartRepository::new(&pool);
    let item = cart.add_item(user, product, Quantity::ONE).await.unwrap();

    assert!(cart.remove_item(user, item).await.unwrap());
    assert!(!cart.update_quantity(user, item, 4).await.unwrap());
    assert!(!cart.remove_item(user, item).await.unwrap());
    assert!(cart.get_items(user).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_other_users_lines_are_untouchable(pool: PgPool) {
    let owner = common::register(&pool, "owner@example.com").await;
    let intruder = common::register(&pool, "intruder@example.com").await;
    let product = common::insert_product(&pool, "Hat", 2000).await;
    let cart = CartRepository::new(&pool);
    let item = cart.add_item(owner, product, Quantity::ONE).await.unwrap();

    assert!(!cart.update_quantity(intruder, item, 9).await.unwrap());
    assert!(!cart.remove_item(intruder, item).await.unwrap());

    let lines = cart.get_items(owner).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity.get(), 1);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_concurrent_remove_and_update_leave_one_outcome(pool: PgPool) {
    let user = common::register(&pool, "contend@example.com").await;
    let product = common::insert_product(&pool, "Scarf", 1500).await;
    let cart = CartRepository::new(&pool);
    let item = cart.add_item(user, product, Quantity::ONE).await.unwrap();

    let (removed, updated) = tokio::join!(
        cart.remove_item(user, item),
        cart.update_quantity(user, item, 4),
    );
    let removed = removed.unwrap();
    let updated = updated.unwrap();

    // Whichever statement runs second sees the first one's result
    let lines = cart.get_items(user).await.unwrap();
    match lines.as_slice() {
        [] => assert!(removed),
        [line] => {
            assert!(updated && !removed);
            assert_eq!(line.quantity.get(), 4);
        }
        more => panic!("expected at most one line, found {}", more.len()),
    }
}
