//! Registration, login and logout handlers.

use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde_json::json;

use crate::auth::{self, DoctorRegistration, PatientRegistration};
use crate::models::Role;

use super::super::error::ApiError;
use super::super::middleware::bearer_token;
use super::super::types::{ApiContext, LoginRequest, LoginResponse};

pub async fn register_doctor(
    Extension(ctx): Extension<ApiContext>,
    Json(reg): Json<DoctorRegistration>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = ctx.lock_db()?;
    auth::register_doctor(&mut conn, &reg)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": "Doctor registered successfully" })),
    ))
}

pub async fn register_patient(
    Extension(ctx): Extension<ApiContext>,
    Json(reg): Json<PatientRegistration>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = ctx.lock_db()?;
    auth::register_patient(&mut conn, &reg)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Patient registered successfully",
        })),
    ))
}

pub async fn login_doctor(
    Extension(ctx): Extension<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    login(ctx, req, Role::Doctor)
}

pub async fn login_patient(
    Extension(ctx): Extension<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    login(ctx, req, Role::Patient)
}

fn login(ctx: ApiContext, req: LoginRequest, expected: Role) -> Result<Json<LoginResponse>, ApiError> {
    let account = {
        let conn = ctx.lock_db()?;
        auth::login(&conn, &req.email, &req.password, expected)?
    };
    let token = {
        let mut sessions = ctx.lock_sessions()?;
        sessions.issue(account.id, account.role)
    };
    tracing::info!(role = account.role.as_str(), "login");
    Ok(Json(LoginResponse {
        success: true,
        token,
        redirect_url: account.role.dashboard_url(),
    }))
}

/// Revokes the presented token. Always succeeds, even without one.
pub async fn logout(
    Extension(ctx): Extension<ApiContext>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(token) = bearer_token(&headers) {
        let token = token.to_string();
        let mut sessions = ctx.lock_sessions()?;
        sessions.revoke(&token);
    }
    Ok(Json(json!({ "success": true })))
}
