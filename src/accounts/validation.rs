//! Request shape checks that run before any use-case or store call.

use lazy_static::lazy_static;
use regex::Regex;

use super::dto::{LoginRequest, RegisterRequest, UpdateUserRequest};
use super::response::*;

pub const MIN_PASSWORD_LEN: usize = 6;

// Column widths of the users table, counted in characters.
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_IMAGE_URL_LEN: usize = 255;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]{3,30}$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn check_len(value: &str, max: usize, message: &str) -> Result<(), ApiError> {
    if value.chars().count() > max {
        return Err(ApiError::validation(message));
    }
    Ok(())
}

fn check_contact(name: &str, phone: &str, mobile: &str, image_url: &str) -> Result<(), ApiError> {
    check_len(name.trim(), MAX_NAME_LEN, MSG_NAME_TOO_LONG)?;
    check_len(phone, MAX_PHONE_LEN, MSG_PHONE_TOO_LONG)?;
    check_len(mobile, MAX_PHONE_LEN, MSG_MOBILE_TOO_LONG)?;
    check_len(image_url, MAX_IMAGE_URL_LEN, MSG_IMAGE_URL_TOO_LONG)
}

fn check_role_id(role_id: Option<i32>) -> Result<(), ApiError> {
    match role_id {
        Some(id) if id <= 0 => Err(ApiError::validation(MSG_INVALID_ROLE_ID)),
        _ => Ok(()),
    }
}

pub fn validate_user_id(id: i64) -> Result<(), ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(MSG_INVALID_USER_ID));
    }
    Ok(())
}

/// Also used for the authenticated create, which takes the same body.
pub fn validate_register(req: &RegisterRequest) -> Result<(), ApiError> {
    if is_blank(&req.username) {
        return Err(ApiError::validation(MSG_USERNAME_REQUIRED));
    }
    if is_blank(&req.name) {
        return Err(ApiError::validation(MSG_NAME_REQUIRED));
    }
    if is_blank(&req.email) {
        return Err(ApiError::validation(MSG_EMAIL_REQUIRED));
    }
    if is_blank(&req.password) {
        return Err(ApiError::validation(MSG_PASSWORD_REQUIRED));
    }
    if !is_valid_email(req.email.trim()) {
        return Err(ApiError::validation(MSG_INVALID_EMAIL));
    }
    check_len(req.email.trim(), MAX_EMAIL_LEN, MSG_EMAIL_TOO_LONG)?;
    if !is_valid_username(req.username.trim()) {
        return Err(ApiError::validation(MSG_INVALID_USERNAME));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(MSG_PASSWORD_TOO_SHORT));
    }
    check_contact(&req.name, &req.phone, &req.mobile, &req.image_url)?;
    check_role_id(req.role_id)
}

pub fn validate_login(req: &LoginRequest) -> Result<(), ApiError> {
    if is_blank(&req.username) {
        return Err(ApiError::validation(MSG_USERNAME_REQUIRED));
    }
    if is_blank(&req.password) {
        return Err(ApiError::validation(MSG_PASSWORD_REQUIRED));
    }
    Ok(())
}

/// Email is optional on update but must be well formed when given.
pub fn validate_update(req: &UpdateUserRequest) -> Result<(), ApiError> {
    if is_blank(&req.username) {
        return Err(ApiError::validation(MSG_USERNAME_REQUIRED));
    }
    if is_blank(&req.name) {
        return Err(ApiError::validation(MSG_NAME_REQUIRED));
    }
    if let Some(email) = req.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        if !is_valid_email(email) {
            return Err(ApiError::validation(MSG_INVALID_EMAIL));
        }
        check_len(email, MAX_EMAIL_LEN, MSG_EMAIL_TOO_LONG)?;
    }
    if !is_valid_username(req.username.trim()) {
        return Err(ApiError::validation(MSG_INVALID_USERNAME));
    }
    check_contact(&req.name, &req.phone, &req.mobile, &req.image_url)?;
    check_role_id(req.role_id)
}
