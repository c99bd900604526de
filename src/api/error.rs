//! API error types with structured JSON responses.
//!
//! Every error body carries `success: false` plus either a single
//! `error` string or a field→message `errors` map. Role-gated surfaces
//! additionally get a `login_url` hint instead of the HTML redirect the
//! browser flow would perform.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::{AuthError, RegisterError};
use crate::db::DatabaseError;
use crate::models::Role;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<&'static str, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_url: Option<&'static str>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No session where one is required. The message varies by surface
    /// ("Please login to continue" vs the booking page's prompt).
    #[error("{message}")]
    Unauthenticated {
        expected: Role,
        message: &'static str,
    },

    /// Valid session, wrong role for this surface.
    #[error("{}", .expected.access_denied_message())]
    WrongRoleSession { expected: Role },

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Login with correct credentials on the other role's endpoint.
    #[error("{}", .expected.access_denied_message())]
    RoleMismatch { expected: Role },

    #[error("{0}")]
    BadRequest(String),

    #[error("validation failed")]
    Validation(BTreeMap<&'static str, String>),

    #[error("You already booked this slot")]
    DuplicateBooking,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthenticated { expected, message } => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    success: false,
                    error: Some(message.into()),
                    errors: None,
                    login_url: Some(expected.login_url()),
                },
            ),
            ApiError::WrongRoleSession { expected } => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    success: false,
                    error: Some(expected.access_denied_message().into()),
                    errors: None,
                    login_url: Some(expected.login_url()),
                },
            ),
            ApiError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                single_error("Invalid credentials"),
            ),
            ApiError::RoleMismatch { expected } => (
                StatusCode::BAD_REQUEST,
                single_error(expected.access_denied_message()),
            ),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, single_error(&message)),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    success: false,
                    error: None,
                    errors: Some(errors),
                    login_url: None,
                },
            ),
            ApiError::DuplicateBooking => (
                StatusCode::BAD_REQUEST,
                single_error("You already booked this slot"),
            ),
            ApiError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                single_error(&format!("{entity} not found")),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    single_error("An internal error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn single_error(message: &str) -> ErrorBody {
    ErrorBody {
        success: false,
        error: Some(message.to_string()),
        errors: None,
        login_url: None,
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::WrongRole(expected) => ApiError::RoleMismatch { expected },
            AuthError::Hash => ApiError::Internal("password hashing failed".into()),
            AuthError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<RegisterError> for ApiError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::Invalid(message) => ApiError::BadRequest(message),
            RegisterError::Fields(errors) => ApiError::Validation(errors),
            RegisterError::Hash => ApiError::Internal("password hashing failed".into()),
            RegisterError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}
