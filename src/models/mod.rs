pub mod booking;
pub mod intent;
pub mod lexicon;
pub mod session;

pub use booking::{BookingFields, BookingRecord, BookingStatus, Service, Species};
pub use intent::Intent;
pub use lexicon::Lexicon;
pub use session::{AppointmentTime, Session, Slot, Slots, Stage};
