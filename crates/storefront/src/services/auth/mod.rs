//! Authentication service.
//!
//! Email and password accounts. Passwords are hashed with Argon2id and a
//! random salt; the PHC string is the only thing stored.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::LazyLock;

use sqlx::PgPool;
use tracing::instrument;

use boutique_core::Email;

use crate::db::{RepositoryError, UserRepository};
use crate::models::{User, UserCredentials};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles user registration and login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        // The UNIQUE constraint decides the race between two registrations.
        let user = self
            .users
            .create(&email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "account registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// An unknown email and a wrong password produce the same error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let Some(credentials) = self.users.get_credentials_by_email(&email).await? else {
            // Same argon2 cost as a real account, so timing does not reveal
            // which emails are registered.
            verify_against_dummy(password);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(&credentials, password) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(credentials.user)
    }

    /// Find an account by email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let email = Email::parse(email)?;
        Ok(self.users.get_by_email(&email).await?)
    }
}

/// Check a plaintext password against an account's stored hash.
///
/// A hash that fails to parse counts as a mismatch.
#[must_use]
pub fn verify_password(credentials: &UserCredentials, password: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(&credentials.password_hash) else {
        tracing::warn!(user_id = %credentials.user.id, "stored password hash is not a PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hash verified when the login email has no account.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("boutique-dummy-password").ok());

/// Spend one password verification without an account to check against.
fn verify_against_dummy(password: &str) {
    let Some(parsed_hash) = DUMMY_HASH.as_deref().and_then(|h| PasswordHash::new(h).ok()) else {
        return;
    };

    let _ = Argon2::default().verify_password(password.as_bytes(), &parsed_hash);
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use boutique_core::UserId;

    use super::*;

    fn credentials_for(password: &str) -> UserCredentials {
        UserCredentials {
            user: User {
                id: UserId::new(),
                email: Email::parse("shopper@example.com").unwrap(),
                created_at: Utc::now(),
            },
            password_hash: hash_password(password).unwrap(),
        }
    }

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_hash_is_salted_phc_string() {
        let first = hash_password("correct horse").unwrap();
        let second = hash_password("correct horse").unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password() {
        let credentials = credentials_for("correct horse");
        assert!(verify_password(&credentials, "correct horse"));
        assert!(!verify_password(&credentials, "wrong horse"));
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        let mut credentials = credentials_for("correct horse");
        credentials.password_hash = "not-a-hash".to_owned();
        assert!(!verify_password(&credentials, "correct horse"));
    }

    #[test]
    fn test_dummy_hash_costs_the_same_as_a_real_one() {
        let dummy = DUMMY_HASH.as_deref().unwrap();
        let real = hash_password("correct horse").unwrap();

        // $argon2id$v=19$m=..,t=..,p=..$salt$hash
        let params = |phc: &str| phc.split('$').take(4).collect::<Vec<_>>().join("$");
        assert_eq!(params(dummy), params(&real));

        verify_against_dummy("correct horse");
    }
}
