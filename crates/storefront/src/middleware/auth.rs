//! Authentication extractors.
//!
//! The session cookie is verified with the [`SessionManager`] and the user
//! id it carries is confirmed against the `user` table, so a token for an
//! account that no longer exists does not authenticate.
//!
//! [`SessionManager`]: crate::services::SessionManager

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
    response::{IntoResponse, Redirect, Response},
};

use crate::db::{RepositoryError, UserRepository};
use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentUser;
use crate::services::session::token_from_cookie_header;
use crate::state::AppState;

/// Extractor that requires a logged-in user.
///
/// If nobody is logged in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the user is not logged in.
pub enum AuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// The user lookup itself failed.
    Repository(RepositoryError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Repository(err) => AppError::Database(err).into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        current_user(parts, state)
            .await
            .map_err(AuthRejection::Repository)?
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this never rejects the request.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(user): OptionalAuth,
/// ) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.email),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = current_user(parts, state).await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "session user lookup failed");
            None
        });
        Ok(Self(user))
    }
}

/// Resolve the session cookie on a request to a live account.
async fn current_user(
    parts: &Parts,
    state: &AppState,
) -> Result<Option<CurrentUser>, RepositoryError> {
    let token = parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(token_from_cookie_header);

    let Some(user_id) = state.sessions().resolve_session(token.as_deref()) else {
        return Ok(None);
    };

    let Some(user) = UserRepository::new(state.pool()).get_by_id(user_id).await? else {
        tracing::debug!(user_id = %user_id, "session refers to a missing account");
        return Ok(None);
    };

    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(Some(CurrentUser::from(user)))
}
