//! Doctor availability ledger (doctor-gated).

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::db::repository::{delete_slot, insert_slot, list_slots_for_doctor};
use crate::models::{AvailabilitySlot, DEFAULT_SLOT_CAPACITY};

use super::super::error::ApiError;
use super::super::types::{ApiContext, CallerContext, DeclareSlotRequest};

pub async fn list(
    Extension(ctx): Extension<ApiContext>,
    Extension(caller): Extension<CallerContext>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.lock_db()?;
    let slots = list_slots_for_doctor(&conn, &caller.account_id)?;
    Ok(Json(json!({ "success": true, "slots": slots })))
}

/// Declare a slot. Overlap and start/end ordering are not validated.
pub async fn declare(
    Extension(ctx): Extension<ApiContext>,
    Extension(caller): Extension<CallerContext>,
    Json(req): Json<DeclareSlotRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let slot = AvailabilitySlot {
        id: Uuid::new_v4(),
        doctor_id: caller.account_id,
        date: req.date,
        start_time: req.start_time,
        end_time: req.end_time,
        capacity: req.capacity.unwrap_or(DEFAULT_SLOT_CAPACITY),
        is_available: true,
        created_at: Utc::now().naive_utc(),
    };

    let conn = ctx.lock_db()?;
    insert_slot(&conn, &slot)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "slot": slot })),
    ))
}

pub async fn delete(
    Extension(ctx): Extension<ApiContext>,
    Extension(caller): Extension<CallerContext>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.lock_db()?;
    if !delete_slot(&conn, &slot_id, &caller.account_id)? {
        return Err(ApiError::NotFound("Slot"));
    }
    Ok(Json(json!({ "success": true })))
}
