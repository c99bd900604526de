//! Public doctor search and the booking-page slot feed.

use axum::extract::{Path, Query};
use axum::{Extension, Json};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::db::repository::{get_doctor, list_bookable_slots, search_doctors};

use super::super::error::ApiError;
use super::super::types::{ApiContext, SearchQuery, SlotFeedQuery};

pub async fn search(
    Extension(ctx): Extension<ApiContext>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.lock_db()?;
    let doctors = search_doctors(&conn, &query.name, &query.city, &query.specialization)?;
    Ok(Json(json!({ "success": true, "doctors": doctors })))
}

/// Bookable slots for one doctor, from `from` (default today) onwards.
pub async fn slot_feed(
    Extension(ctx): Extension<ApiContext>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<SlotFeedQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.lock_db()?;
    let doctor = get_doctor(&conn, &doctor_id)?.ok_or(ApiError::NotFound("Doctor"))?;

    let from = query.from.unwrap_or_else(|| Utc::now().date_naive());
    let slots = list_bookable_slots(&conn, &doctor.account_id, from)?;
    Ok(Json(json!({ "success": true, "slots": slots })))
}
