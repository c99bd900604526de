use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::AvailabilitySlot;

const SLOT_COLUMNS: &str =
    "id, doctor_id, date, start_time, end_time, capacity, is_available, created_at";

pub fn insert_slot(conn: &Connection, slot: &AvailabilitySlot) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO availability_slots (id, doctor_id, date, start_time, end_time,
             capacity, is_available, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            slot.id.to_string(),
            slot.doctor_id.to_string(),
            slot.date,
            slot.start_time,
            slot.end_time,
            slot.capacity,
            slot.is_available,
            slot.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_slot(conn: &Connection, id: &Uuid) -> Result<Option<AvailabilitySlot>, DatabaseError> {
    let sql = format!("SELECT {SLOT_COLUMNS} FROM availability_slots WHERE id = ?1");
    let row = conn
        .query_row(&sql, params![id.to_string()], slot_row)
        .optional()?;
    row.map(slot_from_row).transpose()
}

/// Slot lookup for booking: only returns the slot while its availability
/// flag is set.
pub fn get_bookable_slot(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<AvailabilitySlot>, DatabaseError> {
    let sql = format!(
        "SELECT {SLOT_COLUMNS} FROM availability_slots WHERE id = ?1 AND is_available = 1"
    );
    let row = conn
        .query_row(&sql, params![id.to_string()], slot_row)
        .optional()?;
    row.map(slot_from_row).transpose()
}

/// All slots a doctor has declared, ordered by (date, start_time).
pub fn list_slots_for_doctor(
    conn: &Connection,
    doctor_account_id: &Uuid,
) -> Result<Vec<AvailabilitySlot>, DatabaseError> {
    let sql = format!(
        "SELECT {SLOT_COLUMNS} FROM availability_slots
         WHERE doctor_id = ?1
         ORDER BY date, start_time"
    );
    collect_slots(conn, &sql, params![doctor_account_id.to_string()])
}

/// Bookable slots for the public booking page: availability flag set and
/// date on or after `from_date`.
pub fn list_bookable_slots(
    conn: &Connection,
    doctor_account_id: &Uuid,
    from_date: NaiveDate,
) -> Result<Vec<AvailabilitySlot>, DatabaseError> {
    let sql = format!(
        "SELECT {SLOT_COLUMNS} FROM availability_slots
         WHERE doctor_id = ?1 AND is_available = 1 AND date >= ?2
         ORDER BY date, start_time"
    );
    collect_slots(conn, &sql, params![doctor_account_id.to_string(), from_date])
}

/// Hard delete, ownership-checked. Returns false when the slot does not
/// exist or belongs to another doctor.
pub fn delete_slot(
    conn: &Connection,
    id: &Uuid,
    doctor_account_id: &Uuid,
) -> Result<bool, DatabaseError> {
    let affected = conn.execute(
        "DELETE FROM availability_slots WHERE id = ?1 AND doctor_id = ?2",
        params![id.to_string(), doctor_account_id.to_string()],
    )?;
    Ok(affected > 0)
}

fn collect_slots(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<AvailabilitySlot>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, slot_row)?;
    let mut slots = Vec::new();
    for row in rows {
        slots.push(slot_from_row(row?)?);
    }
    Ok(slots)
}

struct SlotRow {
    id: String,
    doctor_id: String,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    capacity: u32,
    is_available: bool,
    created_at: NaiveDateTime,
}

fn slot_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SlotRow> {
    Ok(SlotRow {
        id: row.get(0)?,
        doctor_id: row.get(1)?,
        date: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        capacity: row.get(5)?,
        is_available: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn slot_from_row(row: SlotRow) -> Result<AvailabilitySlot, DatabaseError> {
    Ok(AvailabilitySlot {
        id: parse_uuid(&row.id)?,
        doctor_id: parse_uuid(&row.doctor_id)?,
        date: row.date,
        start_time: row.start_time,
        end_time: row.end_time,
        capacity: row.capacity,
        is_available: row.is_available,
        created_at: row.created_at,
    })
}
