use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Clinical write-up attached 1:1 to an appointment. Written via upsert,
/// so saving twice overwrites all three fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalNote {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub notes: String,
    pub prescription: String,
    pub follow_up: String,
    pub created_at: NaiveDateTime,
}
