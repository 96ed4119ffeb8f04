use crate::models::{BookingFields, BookingRecord, BookingStatus, Session, Slots, Stage};
use crate::services::ledger::TransactionLedger;

pub const UNASSIGNED_VET: &str = "Pending assignment";

const INCOMPLETE_BOOKING: &str =
    "Sorry, some of your booking details went missing. Let's start over — how can I help you today?";

/// Outcome of a "confirm" at the confirm stage.
pub enum CommitOutcome {
    Booked { reply: String, record: BookingRecord },
    Incomplete { reply: String },
}

/// Fields for the record, or `None` if any slot is missing or blank.
pub fn booking_fields(slots: &Slots) -> Option<BookingFields> {
    let service = slots.service?;
    slots.breed.as_deref().filter(|b| !b.trim().is_empty())?;
    let species = slots.species_label()?;
    let pet_name = slots.pet_name.as_deref().filter(|n| !n.trim().is_empty())?;
    let datetime = slots.datetime.as_ref()?;

    Some(BookingFields {
        pet_name: pet_name.to_string(),
        species,
        service: service.to_string(),
        datetime: datetime.display(),
        status: BookingStatus::Pending,
        assigned_vet: UNASSIGNED_VET.to_string(),
    })
}

/// Turn the collected slots into a record. The session always leaves the
/// confirm stage: `done` with cleared slots on success, `idle` otherwise.
pub fn commit_booking(session: &mut Session, ledger: &dyn TransactionLedger) -> CommitOutcome {
    let Some(fields) = booking_fields(&session.slots) else {
        tracing::warn!(session_id = %session.id, "confirm reached with incomplete slots");
        session.reset();
        return CommitOutcome::Incomplete {
            reply: INCOMPLETE_BOOKING.to_string(),
        };
    };

    let transaction_hash = ledger.generate_transaction_id(&fields);
    tracing::info!(
        session_id = %session.id,
        service = %fields.service,
        datetime = %fields.datetime,
        tx = %transaction_hash,
        "booking committed"
    );

    session.stage = Stage::Done;
    session.slots.clear();

    let reply = format!(
        "✅ Appointment booked successfully!\n\n\
         Your request has been submitted and is pending confirmation. \
         You'll receive a notification once a vet is assigned.\n\n\
         🔗 Blockchain Receipt (Transaction Hash):\n{transaction_hash}\n\n\
         You can view your appointment in the My Appointments tab."
    );

    CommitOutcome::Booked {
        reply,
        record: BookingRecord {
            fields,
            transaction_hash,
        },
    }
}
