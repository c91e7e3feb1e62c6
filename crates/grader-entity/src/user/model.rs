//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user. This is the principal the authentication gate
/// resolves for every protected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique, stable numeric identifier.
    pub id: i64,
    /// Unique login and display name.
    pub name: String,
    /// Argon2id PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Privileged flag checked by the authorization gate.
    pub is_admin: bool,
    /// When the user signed up.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check if this user may perform privileged operations.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Desired name.
    pub name: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Privileged flag.
    pub is_admin: bool,
}
