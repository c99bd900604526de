use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::{Appointment, AppointmentStatus};

const APPOINTMENT_COLUMNS: &str =
    "id, patient_id, doctor_id, availability_id, appointment_date, start_time,
     end_time, patient_start_time, patient_end_time, reason, status, report_pdf,
     created_at";

pub fn insert_appointment(
    conn: &Connection,
    appointment: &Appointment,
) -> Result<(), DatabaseError> {
    let result = conn.execute(
        "INSERT INTO appointments (id, patient_id, doctor_id, availability_id,
             appointment_date, start_time, end_time, patient_start_time,
             patient_end_time, reason, status, report_pdf, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            appointment.id.to_string(),
            appointment.patient_id.to_string(),
            appointment.doctor_id.to_string(),
            appointment.availability_id.map(|id| id.to_string()),
            appointment.appointment_date,
            appointment.start_time,
            appointment.end_time,
            appointment.patient_start_time,
            appointment.patient_end_time,
            appointment.reason,
            appointment.status.as_str(),
            appointment.report_pdf,
            appointment.created_at,
        ],
    );

    match result {
        Ok(_) => Ok(()),
        // The dedup index turns a lost check-then-insert race into a
        // constraint violation instead of a second identical booking.
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(DatabaseError::ConstraintViolation(
                "duplicate booking".into(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// The duplicate-booking existence check the booking flow runs before
/// insert: same patient, date and identical patient-selected times.
pub fn duplicate_booking_exists(
    conn: &Connection,
    patient_id: &Uuid,
    date: NaiveDate,
    patient_start_time: Option<NaiveTime>,
    patient_end_time: Option<NaiveTime>,
) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM appointments
         WHERE patient_id = ?1 AND appointment_date = ?2
           AND patient_start_time IS ?3 AND patient_end_time IS ?4",
        params![
            patient_id.to_string(),
            date,
            patient_start_time,
            patient_end_time
        ],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn get_appointment(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<Appointment>, DatabaseError> {
    let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1");
    let row = conn
        .query_row(&sql, params![id.to_string()], appointment_row)
        .optional()?;
    row.map(appointment_from_row).transpose()
}

/// Ownership-scoped lookup for patient-initiated transitions.
pub fn get_appointment_for_patient(
    conn: &Connection,
    id: &Uuid,
    patient_id: &Uuid,
) -> Result<Option<Appointment>, DatabaseError> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1 AND patient_id = ?2"
    );
    let row = conn
        .query_row(&sql, params![id.to_string(), patient_id.to_string()], appointment_row)
        .optional()?;
    row.map(appointment_from_row).transpose()
}

/// Ownership-scoped lookup for doctor-initiated mutations.
pub fn get_appointment_for_doctor(
    conn: &Connection,
    id: &Uuid,
    doctor_id: &Uuid,
) -> Result<Option<Appointment>, DatabaseError> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1 AND doctor_id = ?2"
    );
    let row = conn
        .query_row(&sql, params![id.to_string(), doctor_id.to_string()], appointment_row)
        .optional()?;
    row.map(appointment_from_row).transpose()
}

/// A patient's own appointments, most recent date first.
pub fn list_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE patient_id = ?1
         ORDER BY appointment_date DESC"
    );
    collect_appointments(conn, &sql, params![patient_id.to_string()])
}

/// A doctor's schedule feed: date descending, start time ascending.
pub fn list_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE doctor_id = ?1
         ORDER BY appointment_date DESC, start_time"
    );
    collect_appointments(conn, &sql, params![doctor_id.to_string()])
}

pub fn set_status(
    conn: &Connection,
    id: &Uuid,
    status: AppointmentStatus,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE appointments SET status = ?2 WHERE id = ?1",
        params![id.to_string(), status.as_str()],
    )?;
    Ok(())
}

/// Overwrites the date and time window verbatim and resets the status to
/// scheduled, whatever state the appointment was in.
pub fn reschedule_appointment(
    conn: &Connection,
    id: &Uuid,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE appointments
         SET appointment_date = ?2, start_time = ?3, end_time = ?4, status = 'scheduled'
         WHERE id = ?1",
        params![id.to_string(), date, start_time, end_time],
    )?;
    Ok(())
}

/// Hard delete; the medical note goes with it via FK cascade.
pub fn delete_appointment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM appointments WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(())
}

fn collect_appointments(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, appointment_row)?;
    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(appointment_from_row(row?)?);
    }
    Ok(appointments)
}

struct AppointmentRow {
    id: String,
    patient_id: String,
    doctor_id: String,
    availability_id: Option<String>,
    appointment_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    patient_start_time: Option<NaiveTime>,
    patient_end_time: Option<NaiveTime>,
    reason: String,
    status: String,
    report_pdf: Option<String>,
    created_at: NaiveDateTime,
}

fn appointment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        availability_id: row.get(3)?,
        appointment_date: row.get(4)?,
        start_time: row.get(5)?,
        end_time: row.get(6)?,
        patient_start_time: row.get(7)?,
        patient_end_time: row.get(8)?,
        reason: row.get(9)?,
        status: row.get(10)?,
        report_pdf: row.get(11)?,
        created_at: row.get(12)?,
    })
}

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: parse_uuid(&row.id)?,
        patient_id: parse_uuid(&row.patient_id)?,
        doctor_id: parse_uuid(&row.doctor_id)?,
        availability_id: row.availability_id.as_deref().map(parse_uuid).transpose()?,
        appointment_date: row.appointment_date,
        start_time: row.start_time,
        end_time: row.end_time,
        patient_start_time: row.patient_start_time,
        patient_end_time: row.patient_end_time,
        reason: row.reason,
        status: row.status.parse::<AppointmentStatus>()?,
        report_pdf: row.report_pdf,
        created_at: row.created_at,
    })
}
