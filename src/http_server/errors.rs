//! # API Errors
//!
//! Maps service failures onto HTTP status codes and a JSON body
//! `{ "error": message, "code": status, "error_code": CODE }`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::audit::{AuditError, RequestContext, Role};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    #[error("Missing header: {0}")]
    MissingIdentity(&'static str),

    #[error("Invalid header {0}: {1}")]
    InvalidIdentity(&'static str, String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid query parameter: {0}")]
    InvalidQuery(String),

    // ==================
    // Service
    // ==================
    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingIdentity(_) | ApiError::InvalidIdentity(_, _) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::InvalidBody(_) | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Audit(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::MissingIdentity(_) | ApiError::InvalidIdentity(_, _) => "UNAUTHENTICATED",
            ApiError::InvalidBody(_) => "INVALID_BODY",
            ApiError::InvalidQuery(_) => "INVALID_QUERY",
            ApiError::Audit(e) => e.code(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub error_code: &'static str,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code().as_u16(),
            error_code: err.error_code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::from(&self);
        (self.status_code(), Json(body)).into_response()
    }
}

/// Builds the caller's identity from `x-user-id` and `x-user-role`.
pub fn context_from_headers(headers: &HeaderMap) -> ApiResult<RequestContext> {
    let user_id = header_str(headers, USER_ID_HEADER)?;
    let user_id = user_id
        .trim()
        .parse::<u64>()
        .map_err(|_| ApiError::InvalidIdentity(USER_ID_HEADER, "expected a numeric user id".into()))?;

    let role = header_str(headers, USER_ROLE_HEADER)?;
    let role = Role::parse(role).ok_or_else(|| {
        ApiError::InvalidIdentity(USER_ROLE_HEADER, format!("unknown role '{}'", role))
    })?;

    Ok(RequestContext::new(user_id, role))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> ApiResult<&'a str> {
    headers
        .get(name)
        .ok_or(ApiError::MissingIdentity(name))?
        .to_str()
        .map_err(|_| ApiError::InvalidIdentity(name, "not visible ASCII".into()))
}
