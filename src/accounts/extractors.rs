//! Request extractors whose rejections use the account response envelope.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::response::{ApiError, MSG_INVALID_QUERY, MSG_INVALID_REQUEST_BODY, MSG_INVALID_USER_ID};
use super::validation::validate_user_id;

/// JSON body. Unreadable bodies, wrong content types and mistyped fields are
/// validation errors.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!(error = %rejection, "rejected request body");
            ApiError::validation(MSG_INVALID_REQUEST_BODY)
        })?;
        Ok(ApiJson(value))
    }
}

/// Query string deserialized into `T`.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                debug!(error = %rejection, "rejected query string");
                ApiError::validation(MSG_INVALID_QUERY)
            })?;
        Ok(ApiQuery(value))
    }
}

/// Positive user id from the `:id` path segment.
pub struct UserId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                debug!(error = %rejection, "rejected user id");
                ApiError::validation(MSG_INVALID_USER_ID)
            })?;
        validate_user_id(id)?;
        Ok(UserId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::dto::{ListUsersQuery, LoginRequest};
    use crate::accounts::response::ResponseCode;
    use axum::{body::Body, http::header::CONTENT_TYPE};

    fn json_request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn login_body(
        content_type: Option<&str>,
        body: &'static str,
    ) -> Result<LoginRequest, ApiError> {
        ApiJson::<LoginRequest>::from_request(json_request(content_type, body), &())
            .await
            .map(|ApiJson(req)| req)
    }

    async fn list_query(uri: &str) -> Result<ListUsersQuery, ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ApiQuery::<ListUsersQuery>::from_request_parts(&mut parts, &())
            .await
            .map(|ApiQuery(q)| q)
    }

    #[tokio::test]
    async fn reads_a_json_body() {
        let req = login_body(Some("application/json"), r#"{"username":"john","password":"pw"}"#)
            .await
            .unwrap();
        assert_eq!(req.username, "john");
        assert_eq!(req.password, "pw");
    }

    #[tokio::test]
    async fn unreadable_bodies_are_validation_errors() {
        for (content_type, body) in [
            (Some("application/json"), "{not json"),
            (Some("application/json"), r#"{"username":42}"#),
            (Some("text/plain"), r#"{"username":"john"}"#),
            (None, r#"{"username":"john"}"#),
        ] {
            let err = login_body(content_type, body).await.unwrap_err();
            assert_eq!(err.code, ResponseCode::ValidationError);
            assert_eq!(err.message, MSG_INVALID_REQUEST_BODY);
        }
    }

    #[tokio::test]
    async fn query_values_must_have_the_right_type() {
        let query = list_query("/users?page=2&limit=5&search=jo").await.unwrap();
        assert_eq!(query.page, Some(2));
        assert_eq!(query.limit, Some(5));
        assert_eq!(query.search.as_deref(), Some("jo"));

        let query = list_query("/users").await.unwrap();
        assert_eq!(query.page, None);

        let err = list_query("/users?page=abc").await.unwrap_err();
        assert_eq!(err.code, ResponseCode::ValidationError);
        assert_eq!(err.message, MSG_INVALID_QUERY);
    }
}
