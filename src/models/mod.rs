pub mod account;
pub mod appointment;
pub mod availability;
pub mod doctor;
pub mod enums;
pub mod note;
pub mod patient;

pub use account::*;
pub use appointment::*;
pub use availability::*;
pub use doctor::*;
pub use enums::*;
pub use note::*;
pub use patient::*;
