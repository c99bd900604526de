//! Medical report PDF endpoint.

use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use chrono::Utc;
use uuid::Uuid;

use crate::db::repository::{
    get_appointment, get_doctor, get_note_for_appointment, get_patient,
};
use crate::report::render_report;

use super::super::error::ApiError;
use super::super::types::{ApiContext, ReportQuery};

/// Render the appointment's report as PDF bytes. `?download=1` switches
/// the disposition to attachment. No session check (logged).
pub async fn fetch(
    Extension(ctx): Extension<ApiContext>,
    Path(appointment_id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    tracing::warn!(%appointment_id, "report fetch without session check");

    let conn = ctx.lock_db()?;
    let appointment =
        get_appointment(&conn, &appointment_id)?.ok_or(ApiError::NotFound("Appointment"))?;

    let Some(note) = get_note_for_appointment(&conn, &appointment_id)? else {
        // Plain-text 404 rather than the JSON error shape
        return Ok((StatusCode::NOT_FOUND, "Medical note not found").into_response());
    };

    let doctor =
        get_doctor(&conn, &appointment.doctor_id)?.ok_or(ApiError::NotFound("Doctor"))?;
    let patient =
        get_patient(&conn, &appointment.patient_id)?.ok_or(ApiError::NotFound("Patient"))?;

    let pdf = render_report(
        &appointment,
        &doctor,
        &patient,
        &note,
        Utc::now().date_naive(),
    )
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf");
    // Any non-empty download value switches to attachment
    if query.download.as_deref().is_some_and(|v| !v.is_empty()) {
        response = response.header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"medical_report_{appointment_id}.pdf\""),
        );
    }
    response
        .body(pdf.into())
        .map_err(|e| ApiError::Internal(e.to_string()))
}
