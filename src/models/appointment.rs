use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;

/// Booking record binding a patient, a doctor and (optionally) the slot it
/// was drawn from. `start_time`/`end_time` are the doctor's declared window
/// copied from the slot at booking; `patient_start_time`/`patient_end_time`
/// are the patient's chosen sub-range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub availability_id: Option<Uuid>,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub patient_start_time: Option<NaiveTime>,
    pub patient_end_time: Option<NaiveTime>,
    pub reason: String,
    pub status: AppointmentStatus,
    pub report_pdf: Option<String>,
    pub created_at: NaiveDateTime,
}
