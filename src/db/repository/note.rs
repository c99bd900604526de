use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::MedicalNote;

/// Create-or-overwrite: the UNIQUE constraint on appointment_id plus
/// ON CONFLICT makes the upsert a single atomic statement, so there is
/// never more than one note row per appointment.
pub fn upsert_note(
    conn: &Connection,
    appointment_id: &Uuid,
    notes: &str,
    prescription: &str,
    follow_up: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medical_notes (id, appointment_id, notes, prescription, follow_up, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (appointment_id) DO UPDATE SET
             notes = excluded.notes,
             prescription = excluded.prescription,
             follow_up = excluded.follow_up",
        params![
            Uuid::new_v4().to_string(),
            appointment_id.to_string(),
            notes,
            prescription,
            follow_up,
            Utc::now().naive_utc(),
        ],
    )?;
    Ok(())
}

pub fn get_note_for_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Option<MedicalNote>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, appointment_id, notes, prescription, follow_up, created_at
             FROM medical_notes WHERE appointment_id = ?1",
            params![appointment_id.to_string()],
            note_row,
        )
        .optional()?;
    row.map(note_from_row).transpose()
}

struct NoteRow {
    id: String,
    appointment_id: String,
    notes: String,
    prescription: String,
    follow_up: String,
    created_at: NaiveDateTime,
}

fn note_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<NoteRow> {
    Ok(NoteRow {
        id: row.get(0)?,
        appointment_id: row.get(1)?,
        notes: row.get(2)?,
        prescription: row.get(3)?,
        follow_up: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn note_from_row(row: NoteRow) -> Result<MedicalNote, DatabaseError> {
    Ok(MedicalNote {
        id: parse_uuid(&row.id)?,
        appointment_id: parse_uuid(&row.appointment_id)?,
        notes: row.notes,
        prescription: row.prescription,
        follow_up: row.follow_up,
        created_at: row.created_at,
    })
}
