//! Registration and login services.
//!
//! Registration validates fields, then creates the account and the role
//! profile inside one transaction so a failed profile insert can never
//! leave an orphaned account behind.

pub mod password;
pub mod session;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use rusqlite::Connection;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::db::repository::{
    email_exists, find_account_by_email, insert_account, insert_doctor, insert_patient,
};
use crate::db::DatabaseError;
use crate::models::{Account, DoctorProfile, Gender, PatientProfile, Role};

pub const MIN_FULL_NAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;
const DOCTOR_PHONE_DIGITS: usize = 10;
const PATIENT_PHONE_MIN_DIGITS: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{}", .0.access_denied_message())]
    WrongRole(Role),

    #[error("password hashing failed")]
    Hash,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Error)]
pub enum RegisterError {
    /// Doctor registration reports the first failing check as a single
    /// top-level message.
    #[error("{0}")]
    Invalid(String),

    /// Patient registration collects every failing field into a map.
    #[error("validation failed")]
    Fields(BTreeMap<&'static str, String>),

    #[error("password hashing failed")]
    Hash,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorRegistration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub specialization: String,
    pub qualification: String,
    pub experience_years: u32,
    pub clinic_name: String,
    pub city: String,
    pub consultation_fee: f64,
    #[serde(default)]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatientRegistration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub city: String,
}

/// Register a doctor. Checks run in order and the first failure is
/// returned as a single error message.
pub fn register_doctor(
    conn: &mut Connection,
    reg: &DoctorRegistration,
) -> Result<Uuid, RegisterError> {
    let full_name = reg.full_name.trim();
    let email = reg.email.trim().to_lowercase();
    let phone = reg.phone.trim();
    let password = reg.password.trim();

    if full_name.len() < MIN_FULL_NAME_LEN {
        return Err(RegisterError::Invalid(
            "Full name must be at least 3 characters".into(),
        ));
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(RegisterError::Invalid("Enter a valid email address".into()));
    }
    if email_exists(conn, &email)? {
        return Err(RegisterError::Invalid("Email already exists".into()));
    }
    if phone.len() != DOCTOR_PHONE_DIGITS || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(RegisterError::Invalid(
            "Phone number must be 10 digits".into(),
        ));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(RegisterError::Invalid(
            "Password must be at least 6 characters".into(),
        ));
    }

    let account = new_account(&email, password, Role::Doctor)?;
    let doctor = DoctorProfile {
        id: Uuid::new_v4(),
        account_id: account.id,
        full_name: full_name.to_string(),
        phone: phone.to_string(),
        specialization: reg.specialization.trim().to_string(),
        qualification: reg.qualification.trim().to_string(),
        experience_years: reg.experience_years,
        clinic_name: reg.clinic_name.trim().to_string(),
        city: reg.city.trim().to_string(),
        consultation_fee: reg.consultation_fee,
        profile_image: reg.profile_image.clone(),
        created_at: Utc::now().naive_utc(),
    };

    let tx = conn.transaction().map_err(DatabaseError::from)?;
    insert_account(&tx, &account)?;
    insert_doctor(&tx, &doctor)?;
    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(doctor_id = %doctor.id, "doctor registered");
    Ok(doctor.id)
}

/// Register a patient. All failing fields are reported together.
pub fn register_patient(
    conn: &mut Connection,
    reg: &PatientRegistration,
) -> Result<Uuid, RegisterError> {
    let full_name = reg.full_name.trim();
    let email = reg.email.trim().to_lowercase();
    let password = reg.password.trim();
    let phone_clean: String = reg
        .phone
        .trim()
        .chars()
        .filter(|c| *c != '+' && *c != ' ')
        .collect();

    let mut errors = BTreeMap::new();
    if full_name.len() < MIN_FULL_NAME_LEN {
        errors.insert("full_name", "Name must be at least 3 characters".to_string());
    }
    if !EMAIL_RE.is_match(&email) {
        errors.insert("email", "Enter a valid email address".to_string());
    } else if email_exists(conn, &email)? {
        errors.insert("email", "Email already registered".to_string());
    }
    if phone_clean.len() < PATIENT_PHONE_MIN_DIGITS
        || !phone_clean.chars().all(|c| c.is_ascii_digit())
    {
        errors.insert("phone", "Enter valid phone number".to_string());
    }
    if password.len() < MIN_PASSWORD_LEN {
        errors.insert("password", "Password must be at least 6 characters".to_string());
    }
    if !errors.is_empty() {
        return Err(RegisterError::Fields(errors));
    }

    let account = new_account(&email, password, Role::Patient)?;
    let patient = PatientProfile {
        id: Uuid::new_v4(),
        account_id: account.id,
        full_name: full_name.to_string(),
        phone: phone_clean,
        gender: reg.gender,
        date_of_birth: reg.date_of_birth,
        city: reg.city.trim().to_string(),
        created_at: Utc::now().naive_utc(),
    };

    let tx = conn.transaction().map_err(DatabaseError::from)?;
    insert_account(&tx, &account)?;
    insert_patient(&tx, &patient)?;
    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(patient_id = %patient.id, "patient registered");
    Ok(patient.id)
}

/// Authenticate against a role-specific login surface. Unknown email and
/// wrong password are indistinguishable to the caller; a correct password
/// on the wrong surface reports the role mismatch.
pub fn login(
    conn: &Connection,
    email: &str,
    password: &str,
    expected: Role,
) -> Result<Account, AuthError> {
    let email = email.trim().to_lowercase();
    let account = find_account_by_email(conn, &email)?.ok_or(AuthError::InvalidCredentials)?;

    if !password::verify_password(password, &account.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }
    if account.role != expected {
        return Err(AuthError::WrongRole(expected));
    }
    Ok(account)
}

fn new_account(email: &str, password: &str, role: Role) -> Result<Account, RegisterError> {
    let password_hash =
        password::hash_password(password).map_err(|_| RegisterError::Hash)?;
    Ok(Account {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash,
        role,
        created_at: Utc::now().naive_utc(),
    })
}
