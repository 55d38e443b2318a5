use sqlx::FromRow;
use time::OffsetDateTime;

/// Account row as stored. Never serialized directly; see `dto::AccountView`.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub mobile: String,
    pub image_url: String,
    pub password_hash: String, // Argon2 PHC string
    pub is_active: bool,
    pub role_id: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// The mutable part of an account. Update replaces all of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProfile {
    pub username: String,
    pub name: String,
    /// `None` and empty are the same thing: no email.
    pub email: Option<String>,
    pub phone: String,
    pub mobile: String,
    pub image_url: String,
    /// Unset means active.
    pub is_active: Option<bool>,
    pub role_id: i32,
}

impl AccountProfile {
    /// Email with blank values collapsed to `None`.
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }
}

/// Insert payload: a profile plus an already hashed password.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub profile: AccountProfile,
    pub password_hash: String,
}
