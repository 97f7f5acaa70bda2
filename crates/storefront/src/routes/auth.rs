//! Login, registration, and logout handlers.
//!
//! One page serves both forms; the `action` field picks which one was
//! submitted. Failures re-render the page with a message that never says
//! whether the email or the password was wrong.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{
    AppError, Result, auth_message, auth_status, clear_sentry_user, set_sentry_user,
};
use crate::middleware::OptionalAuth;
use crate::models::User;
use crate::routes::NavView;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login and registration form data.
///
/// Fields are optional so a missing field re-renders the page instead of
/// failing extraction.
#[derive(Debug, Deserialize)]
pub struct AuthForm {
    pub action: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login / register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: NavView,
    pub error: Option<String>,
    pub email: String,
}

impl LoginTemplate {
    fn with_error(error: &str, email: String) -> Self {
        Self {
            nav: NavView::default(),
            error: Some(error.to_owned()),
            email,
        }
    }
}

/// Map an `?error=` code from a redirect to a message.
fn query_error_message(code: &str) -> &'static str {
    match code {
        "session" => "Please log in to continue",
        _ => "Something went wrong, please try again",
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
#[instrument(skip(state, user))]
pub async fn login_page(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Result<LoginTemplate> {
    let nav = NavView::load(&state, user.as_ref()).await?;
    Ok(LoginTemplate {
        nav,
        error: query.error.as_deref().map(|c| query_error_message(c).to_owned()),
        email: String::new(),
    })
}

/// Handle login or registration form submission.
#[instrument(skip(state, form), fields(action = form.action.as_deref().unwrap_or("")))]
pub async fn login(State(state): State<AppState>, Form(form): Form<AuthForm>) -> Result<Response> {
    let email = form.email.unwrap_or_default();
    let password = form.password.unwrap_or_default();

    if email.trim().is_empty() || password.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            LoginTemplate::with_error("Email and password are required", email),
        )
            .into_response());
    }

    let auth = AuthService::new(state.pool());
    let result = match form.action.as_deref() {
        Some("login") => auth.login(&email, &password).await,
        Some("register") => auth.register(&email, &password).await,
        _ => {
            return Ok((
                StatusCode::BAD_REQUEST,
                LoginTemplate::with_error("Invalid action", email),
            )
                .into_response());
        }
    };

    match result {
        Ok(user) => start_session(&state, &user),
        Err(err @ (AuthError::Repository(_) | AuthError::PasswordHash)) => Err(err.into()),
        Err(err) => {
            tracing::info!(error = %err, "authentication rejected");
            let status = auth_status(&err);
            let page = LoginTemplate::with_error(auth_message(&err), email);
            Ok((status, page).into_response())
        }
    }
}

/// Issue a session cookie for `user` and send them to the catalog.
fn start_session(state: &AppState, user: &User) -> Result<Response> {
    let token = state
        .sessions()
        .create_session(user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let cookie = state.sessions().session_cookie(token);

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "session started");

    Ok((
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        Redirect::to("/products"),
    )
        .into_response())
}

/// Handle logout.
///
/// Clears the cookie in the browser. The token itself is not revoked.
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = state.sessions().destroy_session();
    clear_sentry_user();

    (
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        Redirect::to("/login"),
    )
        .into_response()
}

/// Logout only accepts POST; a GET just goes home.
pub async fn logout_redirect() -> Redirect {
    Redirect::to("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_message() {
        assert_eq!(query_error_message("session"), "Please log in to continue");
        assert_eq!(
            query_error_message("<script>"),
            "Something went wrong, please try again"
        );
    }

    #[test]
    fn test_login_page_renders_forms() {
        let html = LoginTemplate {
            nav: NavView::default(),
            error: Some("Invalid email or password".to_owned()),
            email: "shopper@example.com".to_owned(),
        }
        .render()
        .unwrap_or_default();

        assert!(html.contains(r#"value="login""#));
        assert!(html.contains(r#"value="register""#));
        assert!(html.contains("Invalid email or password"));
        assert!(html.contains("shopper@example.com"));
    }
}
