//! Shared API state and request/response types.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::session::SessionStore;
use crate::models::{AppointmentStatus, Role};

use super::error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ApiContext {
    db: Arc<Mutex<Connection>>,
    sessions: Arc<Mutex<SessionStore>>,
}

impl ApiContext {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            sessions: Arc::new(Mutex::new(SessionStore::new())),
        }
    }

    pub fn lock_db(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".into()))
    }

    pub fn lock_sessions(&self) -> Result<MutexGuard<'_, SessionStore>, ApiError> {
        self.sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock poisoned".into()))
    }
}

/// Authenticated identity injected by the auth middleware.
#[derive(Debug, Clone, Copy)]
pub struct CallerContext {
    pub account_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub redirect_url: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub specialization: String,
}

#[derive(Debug, Deserialize)]
pub struct SlotFeedQuery {
    /// Lower bound for the public booking feed; defaults to today.
    pub from: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct DeclareSlotRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub availability_id: Uuid,
    #[serde(default)]
    pub patient_start_time: Option<NaiveTime>,
    #[serde(default)]
    pub patient_end_time: Option<NaiveTime>,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub prescription: String,
    #[serde(default)]
    pub follow_up: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub download: Option<String>,
}
