//! Medical report rendering.
//!
//! Pure transformation of an appointment plus its clinical note into a
//! single-page A4 PDF: header, side-by-side doctor/patient detail blocks,
//! three wrapped text sections and a footer line. Content that overflows
//! the page is not paginated.

use std::io::BufWriter;

use chrono::NaiveDate;
use printpdf::*;
use thiserror::Error;

use crate::models::{Appointment, DoctorProfile, MedicalNote, PatientProfile};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

const LINE_GAP: f32 = 6.5;
const SECTION_WRAP_CHARS: usize = 90;
const SECTION_LEADING: f32 = 5.6;
const LEFT_X: f32 = 18.0;
const RIGHT_X: f32 = 115.0;
const VALUE_OFFSET: f32 = 42.0;

/// Render the report PDF. Deterministic layout; `today` anchors the
/// patient's derived age.
pub fn render_report(
    appointment: &Appointment,
    doctor: &DoctorProfile,
    patient: &PatientProfile,
    note: &MedicalNote,
    today: NaiveDate,
) -> Result<Vec<u8>, ReportError> {
    let (doc, page1, layer1) = PdfDocument::new("Medical Report", Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = builtin(&doc, BuiltinFont::Helvetica)?;
    let bold = builtin(&doc, BuiltinFont::HelveticaBold)?;
    let oblique = builtin(&doc, BuiltinFont::HelveticaOblique)?;

    let mut y = Mm(280.0);

    // Header
    layer.use_text("MEDICAL REPORT", 18.0, Mm(76.0), y, &bold);
    y -= Mm(14.0);

    layer.use_text(
        format!("Appointment ID: {}", appointment.id),
        11.0,
        Mm(LEFT_X),
        y,
        &font,
    );
    y -= Mm(LINE_GAP);
    layer.use_text(
        format!("Date: {}", appointment.appointment_date.format("%d %b %Y")),
        11.0,
        Mm(LEFT_X),
        y,
        &font,
    );
    y -= Mm(LINE_GAP);
    layer.use_text(
        format!(
            "Time: {} to {}",
            appointment.start_time.format("%I:%M %p"),
            appointment.end_time.format("%I:%M %p"),
        ),
        11.0,
        Mm(LEFT_X),
        y,
        &font,
    );
    y -= Mm(12.0);

    // Doctor details (left column)
    layer.use_text("Doctor Details", 14.0, Mm(LEFT_X), y, &bold);
    let mut y_doctor = y - Mm(9.0);
    for (label, value) in [
        ("Name", format!("Dr. {}", doctor.full_name)),
        ("Specialization", doctor.specialization.clone()),
        ("Qualification", doctor.qualification.clone()),
        ("Experience", format!("{} years", doctor.experience_years)),
        ("Clinic", doctor.clinic_name.clone()),
        ("City", doctor.city.clone()),
        ("Contact", doctor.phone.clone()),
    ] {
        draw_kv(&layer, &font, &bold, Mm(LEFT_X), y_doctor, label, &value);
        y_doctor -= Mm(LINE_GAP);
    }

    // Patient details (right column)
    layer.use_text("Patient Details", 14.0, Mm(RIGHT_X), y, &bold);
    let mut y_patient = y - Mm(9.0);
    for (label, value) in [
        ("Name", patient.full_name.clone()),
        ("Gender", patient.gender.as_str().to_string()),
        ("Age", format!("{} years", patient.age_on(today))),
        ("City", patient.city.clone()),
        ("Contact", patient.phone.clone()),
    ] {
        draw_kv(&layer, &font, &bold, Mm(RIGHT_X), y_patient, label, &value);
        y_patient -= Mm(LINE_GAP);
    }

    // Continue below the taller column
    y = Mm(y_doctor.0.min(y_patient.0)) - Mm(10.0);

    for (title, body) in [
        ("Medical Notes", note.notes.as_str()),
        ("Prescription", note.prescription.as_str()),
        ("Follow Up", note.follow_up.as_str()),
    ] {
        layer.use_text(title, 14.0, Mm(LEFT_X), y, &bold);
        y -= Mm(8.0);
        for line in wrap_text(body, SECTION_WRAP_CHARS) {
            layer.use_text(&line, 11.0, Mm(LEFT_X + 7.0), y, &font);
            y -= Mm(SECTION_LEADING);
        }
        y -= Mm(9.0);
    }

    // Footer
    layer.use_text(
        "Generated by DocApp – Digital Medical Record",
        9.0,
        Mm(LEFT_X),
        Mm(14.0),
        &oblique,
    );

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| ReportError::Pdf(e.to_string()))
}

fn builtin(
    doc: &PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, ReportError> {
    doc.add_builtin_font(font)
        .map_err(|e| ReportError::Pdf(e.to_string()))
}

fn draw_kv(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
    x: Mm,
    y: Mm,
    label: &str,
    value: &str,
) {
    layer.use_text(format!("{label}:"), 11.0, x, y, bold);
    layer.use_text(value, 11.0, x + Mm(VALUE_OFFSET), y, font);
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
