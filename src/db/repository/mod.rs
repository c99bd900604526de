//! Repository layer — entity-scoped database operations.

mod account;
mod appointment;
mod availability;
mod doctor;
mod note;
mod patient;

pub use account::*;
pub use appointment::*;
pub use availability::*;
pub use doctor::*;
pub use note::*;
pub use patient::*;

use uuid::Uuid;

use super::DatabaseError;

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveTime, Utc};
    use rusqlite::Connection;
    use uuid::Uuid;

    use super::*;
    use crate::models::*;

    pub fn seed_doctor(conn: &Connection, email: &str) -> (Account, DoctorProfile) {
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "$pbkdf2-sha256$test".into(),
            role: Role::Doctor,
            created_at: Utc::now().naive_utc(),
        };
        insert_account(conn, &account).unwrap();

        let doctor = DoctorProfile {
            id: Uuid::new_v4(),
            account_id: account.id,
            full_name: "Meera Nair".into(),
            phone: "9123456780".into(),
            specialization: "Cardiology".into(),
            qualification: "MD".into(),
            experience_years: 12,
            clinic_name: "Heartline Clinic".into(),
            city: "Kochi".into(),
            consultation_fee: 600.0,
            profile_image: None,
            created_at: Utc::now().naive_utc(),
        };
        insert_doctor(conn, &doctor).unwrap();
        (account, doctor)
    }

    pub fn seed_patient(conn: &Connection, email: &str) -> (Account, PatientProfile) {
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "$pbkdf2-sha256$test".into(),
            role: Role::Patient,
            created_at: Utc::now().naive_utc(),
        };
        insert_account(conn, &account).unwrap();

        let patient = PatientProfile {
            id: Uuid::new_v4(),
            account_id: account.id,
            full_name: "Ravi Kumar".into(),
            phone: "9876543210".into(),
            gender: Gender::Male,
            date_of_birth: NaiveDate::from_ymd_opt(1994, 3, 20).unwrap(),
            city: "Pune".into(),
            created_at: Utc::now().naive_utc(),
        };
        insert_patient(conn, &patient).unwrap();
        (account, patient)
    }

    pub fn seed_slot(conn: &Connection, doctor_account: Uuid, date: NaiveDate) -> AvailabilitySlot {
        let slot = AvailabilitySlot {
            id: Uuid::new_v4(),
            doctor_id: doctor_account,
            date,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            capacity: DEFAULT_SLOT_CAPACITY,
            is_available: true,
            created_at: Utc::now().naive_utc(),
        };
        insert_slot(conn, &slot).unwrap();
        slot
    }

    pub fn seed_appointment(
        conn: &Connection,
        patient: &PatientProfile,
        doctor: &DoctorProfile,
        slot: &AvailabilitySlot,
    ) -> Appointment {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: patient.id,
            doctor_id: doctor.id,
            availability_id: Some(slot.id),
            appointment_date: slot.date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            patient_start_time: Some(NaiveTime::from_hms_opt(9, 30, 0).unwrap()),
            patient_end_time: Some(NaiveTime::from_hms_opt(10, 0, 0).unwrap()),
            reason: "Chest pain".into(),
            status: AppointmentStatus::Scheduled,
            report_pdf: None,
            created_at: Utc::now().naive_utc(),
        };
        insert_appointment(conn, &appointment).unwrap();
        appointment
    }
}
