use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub specialization: String,
    pub qualification: String,
    pub experience_years: u32,
    pub clinic_name: String,
    pub city: String,
    pub consultation_fee: f64,
    pub profile_image: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Public search-result card: profile fields plus the account email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorCard {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub qualification: String,
    pub experience_years: u32,
    pub clinic_name: String,
    pub city: String,
    pub consultation_fee: f64,
    pub profile_image: Option<String>,
}
