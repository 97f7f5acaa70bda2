//! Seed the catalog with demo categories and products.
//!
//! Ids are fixed so re-running the command inserts nothing new, and the
//! seeded products keep stable URLs across databases.

use boutique_core::{CategoryId, Price, ProductId};
use sqlx::PgConnection;
use tracing::info;
use uuid::Uuid;

use boutique_storefront::db;

use super::{CommandError, database_url};

struct SeedCategory {
    id: CategoryId,
    name: &'static str,
}

struct SeedProduct {
    id: ProductId,
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    category_id: CategoryId,
    image_url: &'static str,
}

const DRESSES: CategoryId =
    CategoryId::from_uuid(Uuid::from_u128(0x6a1d_0c2e_4b1f_4c8e_9e60_0000_0000_0001));
const TOPS: CategoryId =
    CategoryId::from_uuid(Uuid::from_u128(0x6a1d_0c2e_4b1f_4c8e_9e60_0000_0000_0002));
const BOTTOMS: CategoryId =
    CategoryId::from_uuid(Uuid::from_u128(0x6a1d_0c2e_4b1f_4c8e_9e60_0000_0000_0003));

const CATEGORIES: [SeedCategory; 3] = [
    SeedCategory {
        id: DRESSES,
        name: "Dresses",
    },
    SeedCategory {
        id: TOPS,
        name: "Tops",
    },
    SeedCategory {
        id: BOTTOMS,
        name: "Bottoms",
    },
];

const PRODUCTS: [SeedProduct; 3] = [
    SeedProduct {
        id: ProductId::from_uuid(Uuid::from_u128(0x3f9b_27d4_81c6_4e0a_b5d2_0000_0000_0001)),
        name: "Elegant Maxi Dress",
        description: "A beautiful flowy maxi dress for any occasion.",
        price_cents: 12999,
        category_id: DRESSES,
        image_url: "/static/images/dress1.jpg",
    },
    SeedProduct {
        id: ProductId::from_uuid(Uuid::from_u128(0x3f9b_27d4_81c6_4e0a_b5d2_0000_0000_0002)),
        name: "Casual T-Shirt",
        description: "A soft and comfortable cotton t-shirt.",
        price_cents: 2999,
        category_id: TOPS,
        image_url: "/static/images/tshirt1.jpg",
    },
    SeedProduct {
        id: ProductId::from_uuid(Uuid::from_u128(0x3f9b_27d4_81c6_4e0a_b5d2_0000_0000_0003)),
        name: "Slim Fit Jeans",
        description: "Classic slim-fit jeans with a modern look.",
        price_cents: 7999,
        category_id: BOTTOMS,
        image_url: "/static/images/jeans1.jpg",
    },
];

/// Insert the demo catalog in one transaction.
///
/// # Errors
///
/// Returns an error if the database URL is missing or any insert fails;
/// nothing is committed in that case.
pub async fn catalog() -> Result<(), CommandError> {
    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let mut tx = pool.begin().await?;
    let (categories, products) = insert_catalog(&mut tx).await?;
    tx.commit().await?;

    info!(
        categories_inserted = categories,
        products_inserted = products,
        "Catalog seeded"
    );
    Ok(())
}

async fn insert_catalog(conn: &mut PgConnection) -> Result<(u64, u64), CommandError> {
    let mut categories = 0;
    for category in &CATEGORIES {
        categories += sqlx::query(
            r"
            INSERT INTO storefront.category (id, name)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(category.id)
        .bind(category.name)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    let mut products = 0;
    for product in &PRODUCTS {
        let price = Price::from_cents(product.price_cents)?;
        products += sqlx::query(
            r"
            INSERT INTO storefront.product (id, name, description, price, category_id, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(product.id)
        .bind(product.name)
        .bind(product.description)
        .bind(price)
        .bind(product.category_id)
        .bind(product.image_url)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    Ok((categories, products))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_seed_ids_are_unique() {
        let categories: HashSet<_> = CATEGORIES.iter().map(|c| c.id).collect();
        let products: HashSet<_> = PRODUCTS.iter().map(|p| p.id).collect();
        assert_eq!(categories.len(), CATEGORIES.len());
        assert_eq!(products.len(), PRODUCTS.len());
    }

    #[test]
    fn test_every_product_has_a_seeded_category() {
        let categories: HashSet<_> = CATEGORIES.iter().map(|c| c.id).collect();
        assert!(PRODUCTS.iter().all(|p| categories.contains(&p.category_id)));
    }

    #[test]
    fn test_prices_are_valid() {
        for product in &PRODUCTS {
            assert!(Price::from_cents(product.price_cents).is_ok(), "{}", product.name);
        }
        assert_eq!(
            Price::from_cents(PRODUCTS[0].price_cents).map(|p| p.to_string()),
            Ok("$129.99".to_owned())
        );
    }
}
