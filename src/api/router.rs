//! Route table and middleware wiring.

use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::endpoints::{appointments, auth, availability, doctors, notes, reports};
use super::middleware::{require_doctor, require_patient};
use super::types::ApiContext;

pub fn build_router(ctx: ApiContext) -> Router {
    let patient_routes = Router::new()
        .route("/api/appointments", get(appointments::list_own))
        .route("/api/appointments/:id/checkin", post(appointments::checkin))
        .route("/api/appointments/:id/cancel", post(appointments::cancel))
        .route(
            "/api/appointments/:id/reschedule",
            post(appointments::reschedule),
        )
        .route_layer(from_fn(require_patient));

    let doctor_routes = Router::new()
        .route("/api/doctor/appointments", get(appointments::doctor_list))
        .route(
            "/api/doctor/appointments/:id/update",
            post(appointments::doctor_update),
        )
        .route(
            "/api/doctor/appointments/:id/delete",
            post(appointments::doctor_delete),
        )
        .route(
            "/api/doctor/appointments/:id/present",
            post(appointments::mark_present),
        )
        .route(
            "/api/doctor/availability",
            get(availability::list).post(availability::declare),
        )
        .route(
            "/api/doctor/availability/:id/delete",
            post(availability::delete),
        )
        .route_layer(from_fn(require_doctor));

    Router::new()
        .route("/api/doctor/register", post(auth::register_doctor))
        .route("/api/patient/register", post(auth::register_patient))
        .route("/api/doctor/login", post(auth::login_doctor))
        .route("/api/patient/login", post(auth::login_patient))
        .route("/api/logout", post(auth::logout))
        .route("/api/doctors/search", get(doctors::search))
        .route("/api/doctors/:id/slots", get(doctors::slot_feed))
        .route("/api/appointments/create", post(appointments::create))
        .route(
            "/api/appointments/:id/notes",
            post(notes::save).get(notes::fetch),
        )
        .route("/api/appointments/:id/report", get(reports::fetch))
        .merge(patient_routes)
        .merge(doctor_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(Extension(ctx))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::db::open_memory_database;

    use super::*;

    fn test_app() -> Router {
        let conn = open_memory_database().unwrap();
        build_router(ApiContext::new(conn))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = send_raw(app, method, uri, token, body).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn send_raw(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    fn doctor_reg() -> Value {
        json!({
            "full_name": "Meera Nair",
            "email": "meera@example.com",
            "phone": "9123456780",
            "password": "secret1",
            "specialization": "Cardiology",
            "qualification": "MD",
            "experience_years": 12,
            "clinic_name": "Heartline Clinic",
            "city": "Kochi",
            "consultation_fee": 600.0,
        })
    }

    fn patient_reg() -> Value {
        json!({
            "full_name": "Ravi Kumar",
            "email": "ravi@example.com",
            "phone": "9876543210",
            "password": "secret1",
            "gender": "Male",
            "date_of_birth": "1994-03-20",
            "city": "Pune",
        })
    }

    async fn register_and_login(app: &Router, role: &str, reg: Value) -> String {
        let (status, _) = send(app, "POST", &format!("/api/{role}/register"), None, Some(reg.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app,
            "POST",
            &format!("/api/{role}/login"),
            None,
            Some(json!({ "email": reg["email"], "password": reg["password"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    async fn declare_slot(app: &Router, doctor_token: &str, date: &str) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/api/doctor/availability",
            Some(doctor_token),
            Some(json!({
                "date": date,
                "start_time": "09:00:00",
                "end_time": "12:00:00",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["slot"]["id"].as_str().unwrap().to_string()
    }

    async fn book(app: &Router, patient_token: &str, slot_id: &str) -> (StatusCode, Value) {
        send(
            app,
            "POST",
            "/api/appointments/create",
            Some(patient_token),
            Some(json!({
                "availability_id": slot_id,
                "patient_start_time": "09:30:00",
                "patient_end_time": "10:00:00",
                "reason": "Chest pain",
            })),
        )
        .await
    }

    #[tokio::test]
    async fn full_booking_flow() {
        let app = test_app();
        let doctor_token = register_and_login(&app, "doctor", doctor_reg()).await;
        let patient_token = register_and_login(&app, "patient", patient_reg()).await;
        let slot_id = declare_slot(&app, &doctor_token, "2099-01-15").await;

        // Public booking-page feed exposes the slot
        let (status, body) = send(&app, "GET", "/api/doctors/search?city=kochi", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let doctor_id = body["doctors"][0]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/doctors/{doctor_id}/slots"),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slots"][0]["id"], slot_id.as_str());

        let (status, body) = book(&app, &patient_token, &slot_id).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Appointment booked successfully");

        // Identical re-booking is rejected
        let (status, body) = book(&app, &patient_token, &slot_id).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "You already booked this slot");

        let (status, body) = send(&app, "GET", "/api/appointments", Some(&patient_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["appointments"].as_array().unwrap().len(), 1);
        assert_eq!(body["appointments"][0]["status"], "scheduled");
    }

    #[tokio::test]
    async fn different_patient_may_book_the_same_slot() {
        let app = test_app();
        let doctor_token = register_and_login(&app, "doctor", doctor_reg()).await;
        let patient_token = register_and_login(&app, "patient", patient_reg()).await;
        let slot_id = declare_slot(&app, &doctor_token, "2099-01-15").await;

        let (status, _) = book(&app, &patient_token, &slot_id).await;
        assert_eq!(status, StatusCode::CREATED);

        // Capacity is recorded but never enforced; a second patient gets in
        let mut other = patient_reg();
        other["email"] = json!("asha@example.com");
        let other_token = register_and_login(&app, "patient", other).await;

        let (status, body) = book(&app, &other_token, &slot_id).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Appointment booked successfully");
    }

    #[tokio::test]
    async fn cancelling_a_completed_appointment_is_a_noop() {
        let app = test_app();
        let doctor_token = register_and_login(&app, "doctor", doctor_reg()).await;
        let patient_token = register_and_login(&app, "patient", patient_reg()).await;
        let slot_id = declare_slot(&app, &doctor_token, "2099-01-15").await;
        let (_, body) = book(&app, &patient_token, &slot_id).await;
        let id = body["appointment_id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/doctor/appointments/{id}/update"),
            Some(&doctor_token),
            Some(json!({ "status": "completed" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/appointments/{id}/cancel"),
            Some(&patient_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "completed");

        let (_, body) = send(&app, "GET", "/api/appointments", Some(&patient_token), None).await;
        assert_eq!(body["appointments"][0]["status"], "completed");
    }

    #[tokio::test]
    async fn booking_without_session_gets_login_prompt() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/appointments/create",
            None,
            Some(json!({ "availability_id": "00000000-0000-0000-0000-000000000000" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Please login to book an appointment");
        assert_eq!(body["login_url"], "/patient/login");
    }

    #[tokio::test]
    async fn doctor_routes_reject_patient_sessions() {
        let app = test_app();
        let patient_token = register_and_login(&app, "patient", patient_reg()).await;

        let (status, body) = send(
            &app,
            "GET",
            "/api/doctor/appointments",
            Some(&patient_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Doctor access only");
        assert_eq!(body["login_url"], "/doctor/login");
    }

    #[tokio::test]
    async fn wrong_login_surface_reports_role() {
        let app = test_app();
        let _ = register_and_login(&app, "patient", patient_reg()).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/doctor/login",
            None,
            Some(json!({ "email": "ravi@example.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Doctor access only");
    }

    #[tokio::test]
    async fn patient_register_collects_field_errors() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/patient/register",
            None,
            Some(json!({
                "full_name": "Ra",
                "email": "not-an-email",
                "phone": "12",
                "password": "shrt",
                "gender": "Male",
                "date_of_birth": "1994-03-20",
                "city": "Pune",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = body["errors"].as_object().unwrap();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors["password"], "Password must be at least 6 characters");
    }

    #[tokio::test]
    async fn checkin_moves_only_scheduled() {
        let app = test_app();
        let doctor_token = register_and_login(&app, "doctor", doctor_reg()).await;
        let patient_token = register_and_login(&app, "patient", patient_reg()).await;
        let slot_id = declare_slot(&app, &doctor_token, "2099-01-15").await;
        let (_, body) = book(&app, &patient_token, &slot_id).await;
        let id = body["appointment_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/appointments/{id}/checkin"),
            Some(&patient_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "checked_in");

        // Cancel, then a second check-in stays put
        let (_, body) = send(
            &app,
            "POST",
            &format!("/api/appointments/{id}/cancel"),
            Some(&patient_token),
            None,
        )
        .await;
        assert_eq!(body["status"], "cancelled_by_patient");

        let (_, body) = send(
            &app,
            "POST",
            &format!("/api/appointments/{id}/checkin"),
            Some(&patient_token),
            None,
        )
        .await;
        assert_eq!(body["status"], "cancelled_by_patient");
    }

    #[tokio::test]
    async fn reschedule_resets_status_to_scheduled() {
        let app = test_app();
        let doctor_token = register_and_login(&app, "doctor", doctor_reg()).await;
        let patient_token = register_and_login(&app, "patient", patient_reg()).await;
        let slot_id = declare_slot(&app, &doctor_token, "2099-01-15").await;
        let (_, body) = book(&app, &patient_token, &slot_id).await;
        let id = body["appointment_id"].as_str().unwrap().to_string();

        // Doctor marks it completed
        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/doctor/appointments/{id}/update"),
            Some(&doctor_token),
            Some(json!({ "status": "completed" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/appointments/{id}/reschedule"),
            Some(&patient_token),
            Some(json!({
                "appointment_date": "2099-02-01",
                "start_time": "10:00:00",
                "end_time": "10:30:00",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "scheduled");
    }

    #[tokio::test]
    async fn notes_and_report_round() {
        let app = test_app();
        let doctor_token = register_and_login(&app, "doctor", doctor_reg()).await;
        let patient_token = register_and_login(&app, "patient", patient_reg()).await;
        let slot_id = declare_slot(&app, &doctor_token, "2099-01-15").await;
        let (_, body) = book(&app, &patient_token, &slot_id).await;
        let id = body["appointment_id"].as_str().unwrap().to_string();

        // Report before any note exists: plain-text 404
        let response = send_raw(&app, "GET", &format!("/api/appointments/{id}/report"), None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        assert_eq!(&bytes[..], b"Medical note not found");

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/appointments/{id}/notes"),
            None,
            Some(json!({
                "notes": "Mild arrhythmia observed.",
                "prescription": "Metoprolol 25mg once daily.",
                "follow_up": "Review in two weeks.",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Notes saved successfully");

        let (status, body) = send(&app, "GET", &format!("/api/appointments/{id}/notes"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["note"]["prescription"], "Metoprolol 25mg once daily.");

        let response = send_raw(
            &app,
            "GET",
            &format!("/api/appointments/{id}/report?download=1"),
            None,
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"medical_report_"));
        let bytes = to_bytes(response.into_body(), 8 << 20).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        // Any non-empty download value downloads; empty or absent renders inline
        let response = send_raw(
            &app,
            "GET",
            &format!("/api/appointments/{id}/report?download=yes"),
            None,
            None,
        )
        .await;
        assert!(response.headers().contains_key(header::CONTENT_DISPOSITION));

        let response = send_raw(
            &app,
            "GET",
            &format!("/api/appointments/{id}/report?download="),
            None,
            None,
        )
        .await;
        assert!(!response.headers().contains_key(header::CONTENT_DISPOSITION));
    }

    #[tokio::test]
    async fn doctor_delete_removes_appointment() {
        let app = test_app();
        let doctor_token = register_and_login(&app, "doctor", doctor_reg()).await;
        let patient_token = register_and_login(&app, "patient", patient_reg()).await;
        let slot_id = declare_slot(&app, &doctor_token, "2099-01-15").await;
        let (_, body) = book(&app, &patient_token, &slot_id).await;
        let id = body["appointment_id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/doctor/appointments/{id}/delete"),
            Some(&doctor_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", "/api/doctor/appointments", Some(&doctor_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["appointments"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn logout_revokes_the_session() {
        let app = test_app();
        let patient_token = register_and_login(&app, "patient", patient_reg()).await;

        let (status, _) = send(&app, "POST", "/api/logout", Some(&patient_token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", "/api/appointments", Some(&patient_token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Please login to continue");
    }

    #[tokio::test]
    async fn slot_delete_is_ownership_checked() {
        let app = test_app();
        let doctor_token = register_and_login(&app, "doctor", doctor_reg()).await;
        let slot_id = declare_slot(&app, &doctor_token, "2099-01-15").await;

        let mut other = doctor_reg();
        other["email"] = json!("other@example.com");
        let other_token = register_and_login(&app, "doctor", other).await;

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/doctor/availability/{slot_id}/delete"),
            Some(&other_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/doctor/availability/{slot_id}/delete"),
            Some(&doctor_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
