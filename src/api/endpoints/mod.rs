pub mod appointments;
pub mod auth;
pub mod availability;
pub mod doctors;
pub mod notes;
pub mod reports;
