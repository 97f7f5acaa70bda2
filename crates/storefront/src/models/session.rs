//! Session-related types.

use serde::{Deserialize, Serialize};

use boutique_core::{Email, UserId};

use super::user::User;

/// The authenticated user for the current request.
///
/// Resolved from the signed session cookie and confirmed against the
/// `user` table, so a token for a deleted account never authenticates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}
