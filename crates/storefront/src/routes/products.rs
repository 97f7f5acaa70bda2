//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use boutique_core::ProductId;

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::Product;
use crate::routes::NavView;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone, Debug)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub nav: NavView,
    pub products: Vec<ProductView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: NavView,
    pub product: ProductView,
    pub category: Option<String>,
    pub logged_in: bool,
}

/// Display product listing page.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<ProductsIndexTemplate> {
    let products = CatalogRepository::new(state.pool()).list_products().await?;
    let nav = NavView::load(&state, user.as_ref()).await?;

    Ok(ProductsIndexTemplate {
        nav,
        products: products.iter().map(ProductView::from).collect(),
    })
}

/// Display product detail page.
///
/// An id that is not a UUID is treated like an unknown product.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let not_found = || AppError::NotFound("Product not found".to_string());

    let product_id: ProductId = id.parse().map_err(|_| not_found())?;
    let catalog = CatalogRepository::new(state.pool());
    let product = catalog.get_product(product_id).await?.ok_or_else(not_found)?;

    let category = match product.category_id {
        Some(category_id) => catalog.get_category(category_id).await?.map(|c| c.name),
        None => None,
    };

    let nav = NavView::load(&state, user.as_ref()).await?;

    Ok(ProductShowTemplate {
        logged_in: user.is_some(),
        nav,
        product: ProductView::from(&product),
        category,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::Price;

    use super::*;

    fn dress() -> Product {
        Product {
            id: ProductId::new(),
            name: "Elegant Maxi Dress".to_owned(),
            description: None,
            price: Price::from_cents(12999).unwrap(),
            category_id: None,
            image_url: Some("/static/images/dress1.jpg".to_owned()),
        }
    }

    #[test]
    fn test_product_view_formats_price() {
        let view = ProductView::from(&dress());
        assert_eq!(view.price, "$129.99");
        assert_eq!(view.description, "");
    }

    #[test]
    fn test_listing_links_to_detail() {
        let product = dress();
        let html = ProductsIndexTemplate {
            nav: NavView::default(),
            products: vec![ProductView::from(&product)],
        }
        .render()
        .unwrap();

        assert!(html.contains(&format!("/products/{}", product.id)));
        assert!(html.contains("Elegant Maxi Dress"));
        assert!(html.contains("$129.99"));
    }

    #[test]
    fn test_detail_hides_cart_form_for_guests() {
        let html = ProductShowTemplate {
            nav: NavView::default(),
            product: ProductView::from(&dress()),
            category: Some("Dresses".to_owned()),
            logged_in: false,
        }
        .render()
        .unwrap();

        assert!(html.contains("Dresses"));
        assert!(!html.contains(r#"value="add""#));
        assert!(html.contains("Log in"));
    }
}
