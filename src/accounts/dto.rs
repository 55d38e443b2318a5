use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::pagination::PaginationInfo;
use super::repo_types::{Account, AccountProfile};
use super::response::ResponseCode;

/// Default role for accounts created without one.
pub const DEFAULT_ROLE_ID: i32 = 1;

/// Request body for registration and for the authenticated create.
///
/// Every field defaults so that a missing field is reported as a validation
/// error rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub password: String,
    pub is_active: Option<bool>,
    pub role_id: Option<i32>,
}

pub type CreateUserRequest = RegisterRequest;

impl RegisterRequest {
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            username: self.username.trim().to_string(),
            name: self.name.trim().to_string(),
            email: Some(self.email.trim().to_string()),
            phone: self.phone.clone(),
            mobile: self.mobile.clone(),
            image_url: self.image_url.clone(),
            is_active: self.is_active,
            role_id: self.role_id.unwrap_or(DEFAULT_ROLE_ID),
        }
    }
}

/// Full replacement profile; there is no password here.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub image_url: String,
    pub is_active: Option<bool>,
    pub role_id: Option<i32>,
}

impl UpdateUserRequest {
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            username: self.username.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.as_deref().map(|e| e.trim().to_string()),
            phone: self.phone.clone(),
            mobile: self.mobile.clone(),
            image_url: self.image_url.clone(),
            is_active: self.is_active,
            role_id: self.role_id.unwrap_or(DEFAULT_ROLE_ID),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

/// Public view of an account. The password hash never leaves the store layer.
#[derive(Debug, Serialize)]
pub struct AccountView {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub mobile: String,
    pub is_active: bool,
    pub role_id: i32,
    pub image_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Account> for AccountView {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            username: a.username,
            name: a.name,
            email: a.email.unwrap_or_default(),
            phone: a.phone,
            mobile: a.mobile,
            is_active: a.is_active,
            role_id: a.role_id,
            image_url: a.image_url,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub code: ResponseCode,
    pub message: String,
    pub token: String,
}

impl AuthResponse {
    pub fn ok(message: &str, token: String) -> Self {
        Self {
            success: true,
            code: ResponseCode::Success,
            message: message.into(),
            token,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub success: bool,
    pub code: ResponseCode,
    pub message: String,
    pub data: AccountView,
}

impl AccountResponse {
    pub fn ok(message: &str, account: Account) -> Self {
        Self {
            success: true,
            code: ResponseCode::Success,
            message: message.into(),
            data: account.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountListResponse {
    pub success: bool,
    pub code: ResponseCode,
    pub message: String,
    pub data: Vec<AccountView>,
    pub pagination: PaginationInfo,
}
