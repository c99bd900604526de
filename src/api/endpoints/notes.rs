//! Medical note write/read.
//!
//! These endpoints carry no role gate. The imbalance is logged on every
//! write so deployments can spot unauthenticated note traffic.

use axum::extract::Path;
use axum::{Extension, Json};
use serde_json::json;
use uuid::Uuid;

use crate::db::repository::{get_appointment, get_note_for_appointment, upsert_note};

use super::super::error::ApiError;
use super::super::types::{ApiContext, NoteRequest};

/// Create-or-overwrite the single note row for an appointment.
pub async fn save(
    Extension(ctx): Extension<ApiContext>,
    Path(appointment_id): Path<Uuid>,
    Json(req): Json<NoteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    tracing::warn!(%appointment_id, "note write without session check");

    let conn = ctx.lock_db()?;
    get_appointment(&conn, &appointment_id)?.ok_or(ApiError::NotFound("Appointment"))?;
    upsert_note(
        &conn,
        &appointment_id,
        req.notes.trim(),
        req.prescription.trim(),
        req.follow_up.trim(),
    )?;

    Ok(Json(json!({
        "status": "success",
        "message": "Notes saved successfully",
    })))
}

/// Fetch the note for an appointment, for prefill on the write page.
pub async fn fetch(
    Extension(ctx): Extension<ApiContext>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.lock_db()?;
    let note = get_note_for_appointment(&conn, &appointment_id)?
        .ok_or(ApiError::NotFound("Medical note"))?;
    Ok(Json(json!({ "success": true, "note": note })))
}
