use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{
        AccountListResponse, AccountResponse, AccountView, AuthResponse, CreateUserRequest,
        ListUsersQuery, LoginRequest, RegisterRequest, UpdateUserRequest,
    },
    errors::AccountError,
    extractors::{ApiJson, ApiQuery, UserId},
    response::*,
    validation::{validate_login, validate_register, validate_update},
};
use crate::{auth::extractors::BearerToken, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validate_register(&payload)?;
    let token = state
        .accounts
        .register(payload.profile(), &payload.password)
        .await
        .map_err(|e| ApiError::from_account(e, MSG_USER_REGISTRATION_FAILED))?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::ok(MSG_USER_REGISTERED, token)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    validate_login(&payload)?;
    let token = state
        .accounts
        .login(payload.username.trim(), &payload.password)
        .await
        .map_err(|e| match e {
            AccountError::InvalidCredential => ApiError::authentication(MSG_INVALID_CREDENTIALS),
            other => ApiError::from_account(other, MSG_USER_LOGIN_FAILED),
        })?;
    Ok(Json(AuthResponse::ok(MSG_USER_LOGGED_IN, token)))
}

#[instrument(skip(state, token))]
pub async fn get_profile(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .accounts
        .get_profile(&token)
        .await
        .map_err(|e| ApiError::from_account(e, MSG_PROFILE_RETRIEVAL_FAILED))?;
    Ok(Json(AccountResponse::ok(MSG_PROFILE_RETRIEVED, account)))
}

#[instrument(skip(state, token))]
pub async fn list_users(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> Result<Json<AccountListResponse>, ApiError> {
    let page = state
        .accounts
        .list_users(&token, query.page, query.limit, query.search.as_deref())
        .await
        .map_err(|e| ApiError::from_account(e, MSG_USER_LIST_FAILED))?;
    Ok(Json(AccountListResponse {
        success: true,
        code: ResponseCode::Success,
        message: MSG_USER_LIST_RETRIEVED.into(),
        data: page.accounts.into_iter().map(AccountView::from).collect(),
        pagination: page.pagination,
    }))
}

#[instrument(skip(state, token))]
pub async fn get_user(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    UserId(id): UserId,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .accounts
        .get_user(&token, id)
        .await
        .map_err(|e| ApiError::from_account(e, MSG_USER_RETRIEVAL_FAILED))?;
    Ok(Json(AccountResponse::ok(MSG_USER_RETRIEVED, account)))
}

#[instrument(skip(state, token, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    validate_register(&payload)?;
    let account = state
        .accounts
        .create_user(&token, payload.profile(), &payload.password)
        .await
        .map_err(|e| ApiError::from_account(e, MSG_USER_CREATION_FAILED))?;
    Ok((
        StatusCode::CREATED,
        Json(AccountResponse::ok(MSG_USER_CREATED, account)),
    ))
}

#[instrument(skip(state, token, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    UserId(id): UserId,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    validate_update(&payload)?;
    let account = state
        .accounts
        .update_user(&token, id, payload.profile())
        .await
        .map_err(|e| ApiError::from_account(e, MSG_USER_UPDATE_FAILED))?;
    Ok(Json(AccountResponse::ok(MSG_USER_UPDATED, account)))
}

#[instrument(skip(state, token))]
pub async fn delete_user(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    UserId(id): UserId,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .accounts
        .delete_user(&token, id)
        .await
        .map_err(|e| ApiError::from_account(e, MSG_USER_DELETION_FAILED))?;
    Ok(Json(MessageResponse::ok(MSG_USER_DELETED)))
}
