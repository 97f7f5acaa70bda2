//! Order confirmation handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use boutique_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{OrderDetail, OrderLine};
use crate::routes::NavView;
use crate::state::AppState;

/// Order line display data. Prices are the snapshot prices.
#[derive(Clone, Debug)]
pub struct OrderItemView {
    pub name: String,
    pub quantity: i32,
    pub price: String,
    pub line_price: String,
    pub image_url: Option<String>,
}

impl From<&OrderLine> for OrderItemView {
    fn from(line: &OrderLine) -> Self {
        Self {
            name: line.product_name.clone(),
            quantity: line.item.quantity.get(),
            price: line.item.price.to_string(),
            line_price: line.line_total().to_string(),
            image_url: line.image_url.clone(),
        }
    }
}

/// Order display data.
#[derive(Clone, Debug)]
pub struct OrderView {
    pub id: String,
    pub order_date: String,
    pub total: String,
    pub items: Vec<OrderItemView>,
}

impl From<&OrderDetail> for OrderView {
    fn from(detail: &OrderDetail) -> Self {
        Self {
            id: detail.order.id.to_string(),
            order_date: detail.order.order_date.format("%B %-d, %Y %H:%M UTC").to_string(),
            total: detail.order.total_amount.to_string(),
            items: detail.lines.iter().map(OrderItemView::from).collect(),
        }
    }
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/confirmation.html")]
pub struct ConfirmationTemplate {
    pub nav: NavView,
    pub order: OrderView,
}

/// Show a placed order to its owner.
///
/// Someone else's order id looks exactly like a missing one.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn confirmation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<String>,
) -> Result<ConfirmationTemplate> {
    let not_found = || AppError::NotFound("Order not found".to_string());

    let order_id: OrderId = order_id.parse().map_err(|_| not_found())?;
    let detail = OrderRepository::new(state.pool())
        .get_for_user(order_id, user.id)
        .await?
        .ok_or_else(not_found)?;

    let nav = NavView::load(&state, Some(&user)).await?;

    Ok(ConfirmationTemplate {
        nav,
        order: OrderView::from(&detail),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use boutique_core::{OrderItemId, Price, ProductId, Quantity, UserId};

    use super::*;
    use crate::models::{Order, OrderItem};

    fn detail() -> OrderDetail {
        let order_id = OrderId::new();
        OrderDetail {
            order: Order {
                id: order_id,
                user_id: UserId::new(),
                order_date: Utc.with_ymd_and_hms(2026, 3, 7, 14, 5, 0).unwrap(),
                total_amount: Price::from_cents(2500).unwrap(),
            },
            lines: vec![OrderLine {
                item: OrderItem {
                    id: OrderItemId::new(),
                    order_id,
                    product_id: ProductId::new(),
                    quantity: Quantity::new(2).unwrap(),
                    price: Price::from_cents(1250).unwrap(),
                },
                product_name: "Casual T-Shirt".to_owned(),
                image_url: None,
            }],
        }
    }

    #[test]
    fn test_order_view() {
        let view = OrderView::from(&detail());
        assert_eq!(view.total, "$25.00");
        assert_eq!(view.order_date, "March 7, 2026 14:05 UTC");
        assert_eq!(view.items[0].price, "$12.50");
        assert_eq!(view.items[0].line_price, "$25.00");
    }

    #[test]
    fn test_confirmation_page() {
        let detail = detail();
        let html = ConfirmationTemplate {
            nav: NavView::default(),
            order: OrderView::from(&detail),
        }
        .render()
        .unwrap();

        assert!(html.contains(&detail.order.id.to_string()));
        assert!(html.contains("Casual T-Shirt"));
        assert!(html.contains("$25.00"));
    }
}
