use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::{DoctorCard, DoctorProfile};

pub fn insert_doctor(conn: &Connection, doctor: &DoctorProfile) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (id, account_id, full_name, phone, specialization,
             qualification, experience_years, clinic_name, city, consultation_fee,
             profile_image, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            doctor.id.to_string(),
            doctor.account_id.to_string(),
            doctor.full_name,
            doctor.phone,
            doctor.specialization,
            doctor.qualification,
            doctor.experience_years,
            doctor.clinic_name,
            doctor.city,
            doctor.consultation_fee,
            doctor.profile_image,
            doctor.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_doctor(conn: &Connection, id: &Uuid) -> Result<Option<DoctorProfile>, DatabaseError> {
    select_doctor(conn, "id = ?1", &id.to_string())
}

pub fn get_doctor_by_account(
    conn: &Connection,
    account_id: &Uuid,
) -> Result<Option<DoctorProfile>, DatabaseError> {
    select_doctor(conn, "account_id = ?1", &account_id.to_string())
}

fn select_doctor(
    conn: &Connection,
    predicate: &str,
    key: &str,
) -> Result<Option<DoctorProfile>, DatabaseError> {
    let sql = format!(
        "SELECT id, account_id, full_name, phone, specialization, qualification,
                experience_years, clinic_name, city, consultation_fee,
                profile_image, created_at
         FROM doctors WHERE {predicate}"
    );
    let row = conn
        .query_row(&sql, params![key], doctor_row)
        .optional()?;
    row.map(doctor_from_row).transpose()
}

/// Case-insensitive substring search over name/city/specialization.
/// Empty filter strings match everything.
pub fn search_doctors(
    conn: &Connection,
    name: &str,
    city: &str,
    specialization: &str,
) -> Result<Vec<DoctorCard>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT d.id, d.full_name, a.email, d.phone, d.specialization,
                d.qualification, d.experience_years, d.clinic_name, d.city,
                d.consultation_fee, d.profile_image
         FROM doctors d
         JOIN accounts a ON a.id = d.account_id
         WHERE (?1 = '' OR d.full_name LIKE '%' || ?1 || '%')
           AND (?2 = '' OR d.city LIKE '%' || ?2 || '%')
           AND (?3 = '' OR d.specialization LIKE '%' || ?3 || '%')
         ORDER BY d.full_name",
    )?;

    let rows = stmt.query_map(params![name, city, specialization], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, u32>(6)?,
            row.get::<_, String>(7)?,
            row.get::<_, String>(8)?,
            row.get::<_, f64>(9)?,
            row.get::<_, Option<String>>(10)?,
        ))
    })?;

    let mut cards = Vec::new();
    for row in rows {
        let (id, name, email, phone, specialization, qualification, experience_years,
            clinic_name, city, consultation_fee, profile_image) = row?;
        cards.push(DoctorCard {
            id: parse_uuid(&id)?,
            name,
            email,
            phone,
            specialization,
            qualification,
            experience_years,
            clinic_name,
            city,
            consultation_fee,
            profile_image,
        });
    }
    Ok(cards)
}

struct DoctorRow {
    id: String,
    account_id: String,
    full_name: String,
    phone: String,
    specialization: String,
    qualification: String,
    experience_years: u32,
    clinic_name: String,
    city: String,
    consultation_fee: f64,
    profile_image: Option<String>,
    created_at: NaiveDateTime,
}

fn doctor_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DoctorRow> {
    Ok(DoctorRow {
        id: row.get(0)?,
        account_id: row.get(1)?,
        full_name: row.get(2)?,
        phone: row.get(3)?,
        specialization: row.get(4)?,
        qualification: row.get(5)?,
        experience_years: row.get(6)?,
        clinic_name: row.get(7)?,
        city: row.get(8)?,
        consultation_fee: row.get(9)?,
        profile_image: row.get(10)?,
        created_at: row.get(11)?,
    })
}

fn doctor_from_row(row: DoctorRow) -> Result<DoctorProfile, DatabaseError> {
    Ok(DoctorProfile {
        id: parse_uuid(&row.id)?,
        account_id: parse_uuid(&row.account_id)?,
        full_name: row.full_name,
        phone: row.phone,
        specialization: row.specialization,
        qualification: row.qualification,
        experience_years: row.experience_years,
        clinic_name: row.clinic_name,
        city: row.city,
        consultation_fee: row.consultation_fee,
        profile_image: row.profile_image,
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::db::repository::fixtures::seed_doctor;

    #[test]
    fn lookup_by_id_and_account() {
        let conn = open_memory_database().unwrap();
        let (account, doctor) = seed_doctor(&conn, "meera@example.com");

        let by_id = get_doctor(&conn, &doctor.id).unwrap().unwrap();
        assert_eq!(by_id.full_name, "Meera Nair");

        let by_account = get_doctor_by_account(&conn, &account.id).unwrap().unwrap();
        assert_eq!(by_account.id, doctor.id);
    }

    #[test]
    fn search_matches_substring_case_insensitively() {
        let conn = open_memory_database().unwrap();
        seed_doctor(&conn, "meera@example.com");

        let hits = search_doctors(&conn, "meera", "", "").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].email, "meera@example.com");

        let hits = search_doctors(&conn, "", "KOCH", "cardio").unwrap();
        assert_eq!(hits.len(), 1);

        let hits = search_doctors(&conn, "", "", "dermatology").unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn empty_filters_return_all() {
        let conn = open_memory_database().unwrap();
        seed_doctor(&conn, "a@example.com");
        seed_doctor(&conn, "b@example.com");

        let hits = search_doctors(&conn, "", "", "").unwrap();
        assert_eq!(hits.len(), 2);
    }
}
