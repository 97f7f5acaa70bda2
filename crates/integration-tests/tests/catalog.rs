//! Catalog repository tests against `PostgreSQL`.

#![allow(clippy::unwrap_used)]

mod common;

use boutique_core::{CategoryId, Price, ProductId};
use boutique_storefront::db::CatalogRepository;
use sqlx::PgPool;

async fn insert_category(pool: &PgPool, name: &str) -> CategoryId {
    let id = CategoryId::new();
    sqlx::query("INSERT INTO storefront.category (id, name) VALUES ($1, $2)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
    id
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_listings_are_sorted_by_name(pool: PgPool) {
    common::insert_product(&pool, "Slim Fit Jeans", 7999).await;
    common::insert_product(&pool, "Casual T-Shirt", 2999).await;
    insert_category(&pool, "Tops").await;
    insert_category(&pool, "Bottoms").await;

    let catalog = CatalogRepository::new(&pool);
    let products: Vec<_> = catalog
        .list_products()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    let categories: Vec<_> = catalog
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();

    assert_eq!(products, ["Casual T-Shirt", "Slim Fit Jeans"]);
    assert_eq!(categories, ["Bottoms", "Tops"]);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_product_category_lookup(pool: PgPool) {
    let dresses = insert_category(&pool, "Dresses").await;
    let product = common::insert_product(&pool, "Elegant Maxi Dress", 12999).await;
    sqlx::query("UPDATE storefront.product SET category_id = $1 WHERE id = $2")
        .bind(dresses)
        .bind(product)
        .execute(&pool)
        .await
        .unwrap();

    let catalog = CatalogRepository::new(&pool);
    let found = catalog.get_product(product).await.unwrap().unwrap();
    assert_eq!(found.price, Price::from_cents(12999).unwrap());
    assert_eq!(found.category_id, Some(dresses));

    let category = catalog.get_category(dresses).await.unwrap().unwrap();
    assert_eq!(category.name, "Dresses");

    assert!(catalog.get_product(ProductId::new()).await.unwrap().is_none());
    assert!(catalog.get_category(CategoryId::new()).await.unwrap().is_none());
}
