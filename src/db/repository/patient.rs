use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::{Gender, PatientProfile};

pub fn insert_patient(conn: &Connection, patient: &PatientProfile) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, account_id, full_name, phone, gender,
             date_of_birth, city, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            patient.id.to_string(),
            patient.account_id.to_string(),
            patient.full_name,
            patient.phone,
            patient.gender.as_str(),
            patient.date_of_birth,
            patient.city,
            patient.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<PatientProfile>, DatabaseError> {
    select_patient(conn, "id = ?1", &id.to_string())
}

pub fn get_patient_by_account(
    conn: &Connection,
    account_id: &Uuid,
) -> Result<Option<PatientProfile>, DatabaseError> {
    select_patient(conn, "account_id = ?1", &account_id.to_string())
}

fn select_patient(
    conn: &Connection,
    predicate: &str,
    key: &str,
) -> Result<Option<PatientProfile>, DatabaseError> {
    let sql = format!(
        "SELECT id, account_id, full_name, phone, gender, date_of_birth, city, created_at
         FROM patients WHERE {predicate}"
    );
    let row = conn
        .query_row(&sql, params![key], patient_row)
        .optional()?;
    row.map(patient_from_row).transpose()
}

struct PatientRow {
    id: String,
    account_id: String,
    full_name: String,
    phone: String,
    gender: String,
    date_of_birth: NaiveDate,
    city: String,
    created_at: NaiveDateTime,
}

fn patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        account_id: row.get(1)?,
        full_name: row.get(2)?,
        phone: row.get(3)?,
        gender: row.get(4)?,
        date_of_birth: row.get(5)?,
        city: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<PatientProfile, DatabaseError> {
    Ok(PatientProfile {
        id: parse_uuid(&row.id)?,
        account_id: parse_uuid(&row.account_id)?,
        full_name: row.full_name,
        phone: row.phone,
        gender: row.gender.parse::<Gender>()?,
        date_of_birth: row.date_of_birth,
        city: row.city,
        created_at: row.created_at,
    })
}
