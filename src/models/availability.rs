use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A doctor-declared bookable window. Capacity is stored but never
/// decremented or enforced anywhere; bookings draw from the slot freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    /// Account id of the owning doctor.
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: u32,
    pub is_available: bool,
    pub created_at: NaiveDateTime,
}

pub const DEFAULT_SLOT_CAPACITY: u32 = 5;
