//! Appointment lifecycle handlers.
//!
//! Booking runs its own session check so the unauthenticated response can
//! carry the booking page's login prompt. The remaining patient and doctor
//! actions rely on the role middleware plus per-row ownership scoping in
//! the repository queries.

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Utc;
use rusqlite::Connection;
use serde_json::json;
use uuid::Uuid;

use crate::db::repository::{
    delete_appointment, duplicate_booking_exists, get_appointment_for_doctor,
    get_appointment_for_patient, get_bookable_slot, get_doctor_by_account,
    get_patient_by_account, insert_appointment, list_for_doctor, list_for_patient,
    reschedule_appointment, set_status,
};
use crate::db::DatabaseError;
use crate::models::{
    Appointment, AppointmentStatus, DoctorProfile, PatientProfile, Role,
};

use super::super::error::ApiError;
use super::super::middleware::bearer_token;
use super::super::types::{
    ApiContext, BookingRequest, CallerContext, RescheduleRequest, StatusUpdateRequest,
};

/// Book an appointment against a bookable slot.
pub async fn create(
    Extension(ctx): Extension<ApiContext>,
    headers: HeaderMap,
    Json(req): Json<BookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = authenticate_booking(&ctx, &headers)?;

    let conn = ctx.lock_db()?;
    let patient = caller_patient(&conn, &caller)?;
    let slot = get_bookable_slot(&conn, &req.availability_id)?
        .ok_or(ApiError::NotFound("Slot"))?;
    // slot.doctor_id is the doctor's account; appointments reference the profile
    let doctor = get_doctor_by_account(&conn, &slot.doctor_id)?
        .ok_or(ApiError::NotFound("Doctor"))?;

    if duplicate_booking_exists(
        &conn,
        &patient.id,
        slot.date,
        req.patient_start_time,
        req.patient_end_time,
    )? {
        return Err(ApiError::DuplicateBooking);
    }

    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id: patient.id,
        doctor_id: doctor.id,
        availability_id: Some(slot.id),
        appointment_date: slot.date,
        start_time: slot.start_time,
        end_time: slot.end_time,
        patient_start_time: req.patient_start_time,
        patient_end_time: req.patient_end_time,
        reason: req.reason.trim().to_string(),
        status: AppointmentStatus::Scheduled,
        report_pdf: None,
        created_at: Utc::now().naive_utc(),
    };

    // A concurrent identical booking trips the unique index instead
    match insert_appointment(&conn, &appointment) {
        Ok(()) => {}
        Err(DatabaseError::ConstraintViolation(_)) => return Err(ApiError::DuplicateBooking),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(appointment_id = %appointment.id, "appointment booked");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Appointment booked successfully",
            "appointment_id": appointment.id,
        })),
    ))
}

/// Patient self check-in. Only a `scheduled` appointment moves; any other
/// status is left untouched.
pub async fn checkin(
    Extension(ctx): Extension<ApiContext>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.lock_db()?;
    let patient = caller_patient(&conn, &caller)?;
    let appointment = get_appointment_for_patient(&conn, &id, &patient.id)?
        .ok_or(ApiError::NotFound("Appointment"))?;

    let status = if appointment.status == AppointmentStatus::Scheduled {
        set_status(&conn, &id, AppointmentStatus::CheckedIn)?;
        AppointmentStatus::CheckedIn
    } else {
        appointment.status
    };
    Ok(Json(json!({ "success": true, "status": status })))
}

/// Patient cancellation. Completed and already-cancelled appointments are
/// left untouched; everything else becomes `cancelled_by_patient`.
pub async fn cancel(
    Extension(ctx): Extension<ApiContext>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.lock_db()?;
    let patient = caller_patient(&conn, &caller)?;
    let appointment = get_appointment_for_patient(&conn, &id, &patient.id)?
        .ok_or(ApiError::NotFound("Appointment"))?;

    let status = match appointment.status {
        AppointmentStatus::Completed | AppointmentStatus::CancelledByPatient => {
            appointment.status
        }
        _ => {
            set_status(&conn, &id, AppointmentStatus::CancelledByPatient)?;
            AppointmentStatus::CancelledByPatient
        }
    };
    Ok(Json(json!({ "success": true, "status": status })))
}

/// Patient reschedule: overwrites date and times verbatim and resets the
/// status to `scheduled`, whatever it was before.
pub async fn reschedule(
    Extension(ctx): Extension<ApiContext>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<RescheduleRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.lock_db()?;
    let patient = caller_patient(&conn, &caller)?;
    get_appointment_for_patient(&conn, &id, &patient.id)?
        .ok_or(ApiError::NotFound("Appointment"))?;

    reschedule_appointment(&conn, &id, req.appointment_date, req.start_time, req.end_time)?;
    Ok(Json(json!({ "success": true, "status": AppointmentStatus::Scheduled })))
}

pub async fn list_own(
    Extension(ctx): Extension<ApiContext>,
    Extension(caller): Extension<CallerContext>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.lock_db()?;
    let patient = caller_patient(&conn, &caller)?;
    let appointments = list_for_patient(&conn, &patient.id)?;
    Ok(Json(json!({ "success": true, "appointments": appointments })))
}

pub async fn doctor_list(
    Extension(ctx): Extension<ApiContext>,
    Extension(caller): Extension<CallerContext>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.lock_db()?;
    let doctor = caller_doctor(&conn, &caller)?;
    let appointments = list_for_doctor(&conn, &doctor.id)?;
    Ok(Json(json!({ "success": true, "appointments": appointments })))
}

/// Doctor status update: any supplied status is written as-is.
pub async fn doctor_update(
    Extension(ctx): Extension<ApiContext>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.lock_db()?;
    let doctor = caller_doctor(&conn, &caller)?;
    get_appointment_for_doctor(&conn, &id, &doctor.id)?
        .ok_or(ApiError::NotFound("Appointment"))?;

    set_status(&conn, &id, req.status)?;
    Ok(Json(json!({ "success": true, "status": req.status })))
}

/// Hard delete; the appointment's note goes with it.
pub async fn doctor_delete(
    Extension(ctx): Extension<ApiContext>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.lock_db()?;
    let doctor = caller_doctor(&conn, &caller)?;
    get_appointment_for_doctor(&conn, &id, &doctor.id)?
        .ok_or(ApiError::NotFound("Appointment"))?;

    delete_appointment(&conn, &id)?;
    Ok(Json(json!({ "success": true })))
}

/// Front-desk "mark present": sets `checked_in` from any status.
pub async fn mark_present(
    Extension(ctx): Extension<ApiContext>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.lock_db()?;
    let doctor = caller_doctor(&conn, &caller)?;
    get_appointment_for_doctor(&conn, &id, &doctor.id)?
        .ok_or(ApiError::NotFound("Appointment"))?;

    set_status(&conn, &id, AppointmentStatus::CheckedIn)?;
    Ok(Json(json!({ "success": true, "status": AppointmentStatus::CheckedIn })))
}

fn authenticate_booking(ctx: &ApiContext, headers: &HeaderMap) -> Result<CallerContext, ApiError> {
    let unauthenticated = ApiError::Unauthenticated {
        expected: Role::Patient,
        message: "Please login to book an appointment",
    };
    let Some(token) = bearer_token(headers).map(str::to_string) else {
        return Err(unauthenticated);
    };
    let sessions = ctx.lock_sessions()?;
    let entry = match sessions.resolve(&token) {
        Some(entry) => entry,
        None => return Err(unauthenticated),
    };
    if entry.role != Role::Patient {
        return Err(ApiError::WrongRoleSession {
            expected: Role::Patient,
        });
    }
    Ok(CallerContext {
        account_id: entry.account_id,
        role: entry.role,
    })
}

fn caller_patient(conn: &Connection, caller: &CallerContext) -> Result<PatientProfile, ApiError> {
    get_patient_by_account(conn, &caller.account_id)?.ok_or(ApiError::NotFound("Patient"))
}

fn caller_doctor(conn: &Connection, caller: &CallerContext) -> Result<DoctorProfile, ApiError> {
    get_doctor_by_account(conn, &caller.account_id)?.ok_or(ApiError::NotFound("Doctor"))
}
