//! Bearer-token authentication middleware.
//!
//! Role-gated route groups are wrapped with `require_doctor` or
//! `require_patient`; on success a `CallerContext` is injected into the
//! request extensions for handlers to pick up.

use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;

use crate::models::Role;

use super::super::error::ApiError;
use super::super::types::{ApiContext, CallerContext};

/// Extract the bearer token from an Authorization header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub async fn require_doctor(
    Extension(ctx): Extension<ApiContext>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(ctx, Role::Doctor, request, next).await
}

pub async fn require_patient(
    Extension(ctx): Extension<ApiContext>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(ctx, Role::Patient, request, next).await
}

async fn require_role(
    ctx: ApiContext,
    expected: Role,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let unauthenticated = ApiError::Unauthenticated {
        expected,
        message: "Please login to continue",
    };
    let Some(token) = bearer_token(request.headers()).map(str::to_string) else {
        return Err(unauthenticated);
    };

    let entry = {
        let sessions = ctx.lock_sessions()?;
        match sessions.resolve(&token) {
            Some(entry) => entry,
            None => return Err(unauthenticated),
        }
    };

    if entry.role != expected {
        return Err(ApiError::WrongRoleSession { expected });
    }

    request.extensions_mut().insert(CallerContext {
        account_id: entry.account_id,
        role: entry.role,
    });
    Ok(next.run(request).await)
}
