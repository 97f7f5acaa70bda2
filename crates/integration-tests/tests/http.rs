//! End-to-end page flows through the storefront router.

#![allow(clippy::unwrap_used)]

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use axum::Router;
use boutique_storefront::routes;
use boutique_storefront::state::AppState;
use sqlx::PgPool;
use tower::ServiceExt;

fn app(pool: PgPool) -> Router {
    routes::app(AppState::new(common::test_config(), pool))
}

async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(request.body(Body::from(body.to_owned())).unwrap())
        .await
        .unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// `name=value` of the session cookie set by a login response.
fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_owned()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn sign_up(app: &Router, email: &str) -> String {
    let body = format!(
        "action=register&email={}&password=correct+horse+battery",
        email.replace('@', "%40")
    );
    let response = post_form(app, "/login", &body, None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");
    session_cookie(&response)
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_browse_add_and_checkout(pool: PgPool) {
    let product = common::insert_product(&pool, "Elegant Maxi Dress", 12999).await;
    let app = app(pool);
    let cookie = sign_up(&app, "flow@example.com").await;

    let page = get(&app, &format!("/products/{product}"), Some(&cookie)).await;
    assert_eq!(page.status(), StatusCode::OK);
    assert!(body_text(page).await.contains("$129.99"));

    let added = post_form(
        &app,
        "/cart",
        &format!("action=add&product_id={product}&quantity=2"),
        Some(&cookie),
    )
    .await;
    assert_eq!(added.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&added), "/cart");

    let cart = body_text(get(&app, "/cart", Some(&cookie)).await).await;
    assert!(cart.contains("Elegant Maxi Dress"));
    assert!(cart.contains("$259.98"));

    let placed = post_form(&app, "/checkout", "action=place_order", Some(&cookie)).await;
    assert_eq!(placed.status(), StatusCode::SEE_OTHER);
    let confirmation_url = location(&placed).to_owned();
    assert!(confirmation_url.starts_with("/order-confirmation/"));

    let confirmation = get(&app, &confirmation_url, Some(&cookie)).await;
    assert_eq!(confirmation.status(), StatusCode::OK);
    assert!(body_text(confirmation).await.contains("$259.98"));

    let emptied = body_text(get(&app, "/cart", Some(&cookie)).await).await;
    assert!(emptied.contains("Your cart is empty."));
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_empty_checkout_redirects_to_cart(pool: PgPool) {
    let app = app(pool);
    let cookie = sign_up(&app, "nothing@example.com").await;

    let response = post_form(&app, "/checkout", "action=place_order", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_confirmation_is_private_to_owner(pool: PgPool) {
    let product = common::insert_product(&pool, "Hat", 2000).await;
    let app = app(pool);
    let owner = sign_up(&app, "owner@example.com").await;
    let other = sign_up(&app, "other@example.com").await;

    post_form(
        &app,
        "/cart",
        &format!("action=add&product_id={product}"),
        Some(&owner),
    )
    .await;
    let placed = post_form(&app, "/checkout", "action=place_order", Some(&owner)).await;
    let url = location(&placed).to_owned();

    let response = get(&app, &url, Some(&other)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_protected_pages_redirect_to_login(pool: PgPool) {
    let app = app(pool);

    for uri in ["/cart", "/checkout"] {
        let response = get(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login", "{uri}");
    }

    let forged = get(&app, "/cart", Some("boutique_session=forged.token")).await;
    assert_eq!(location(&forged), "/login");
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_registration_shows_error(pool: PgPool) {
    let app = app(pool);
    sign_up(&app, "taken@example.com").await;

    let response = post_form(
        &app,
        "/login",
        "action=register&email=taken%40example.com&password=correct+horse+battery",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_text(response).await.contains("Email already registered"));
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_bad_login_is_unauthorized(pool: PgPool) {
    let app = app(pool);
    sign_up(&app, "login@example.com").await;

    let response = post_form(
        &app,
        "/login",
        "action=login&email=login%40example.com&password=wrong+password",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(response).await.contains("Invalid email or password"));
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_unknown_product_is_not_found(pool: PgPool) {
    let app = app(pool);
    let response = get(&app, &format!("/products/{}", uuid::Uuid::new_v4()), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
