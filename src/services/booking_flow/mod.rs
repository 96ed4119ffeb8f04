//! Guided booking conversation.
//!
//! One call per user turn while a booking is in progress. The order of checks
//! is fixed: exit phrases, corrections, mid-flow interrupts (FAQ shortcuts and
//! health asides), then the handler for the current stage.

pub mod commit;
pub mod correction;
pub mod interrupt;
pub mod prompts;

use once_cell::sync::Lazy;
use regex::Regex;

use self::commit::{commit_booking, CommitOutcome};
use self::correction::{apply_correction, detect_correction};
use self::interrupt::{classify_interrupt, hours_answer, Interrupt, PRICING_ANSWER};
use crate::models::lexicon::AnimalMention;
use crate::models::{AppointmentTime, Service, Session, Species, Stage};
use crate::services::ai::extraction::{extract_entity, is_none_marker, title_case};
use crate::services::conversation::TurnReply;
use crate::services::sanitize::unescape_apostrophes;
use crate::services::scheduling::validate_datetime;
use crate::state::AppState;

const EXIT_PHRASES: &[&str] = &[
    "cancel",
    "stop",
    "exit",
    "quit",
    "nevermind",
    "never mind",
    "start over",
    "ulit",
    "basta",
];

static PET_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:name is|named|call (?:him|her|it|them)?|'s name is|siya si|pangalan)\s+([A-Za-z]+)")
        .unwrap()
});

/// Whether any phrase appears on word boundaries, so "Christopher" is not
/// read as "stop".
fn mentions_phrase(lower: &str, phrases: &[&str]) -> bool {
    let padded = format!(
        " {} ",
        lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    );
    phrases.iter().any(|p| padded.contains(&format!(" {p} ")))
}

pub async fn handle_booking_turn(state: &AppState, session: &mut Session, raw: &str) -> TurnReply {
    let text = unescape_apostrophes(raw);
    let lower = text.to_lowercase();
    let stage = session.stage;

    if stage != Stage::Confirm && mentions_phrase(&lower, EXIT_PHRASES) {
        tracing::info!(session_id = %session.id, stage = stage.as_str(), "booking abandoned");
        session.reset();
        return TurnReply::text(prompts::BOOKING_CANCELLED);
    }

    if let Some(correction) = detect_correction(state, session, &text).await {
        tracing::info!(session_id = %session.id, stage = stage.as_str(), ?correction, "applying correction");
        return TurnReply::text(apply_correction(session, correction, &state.clinic_hours()));
    }

    if let Some(interrupt) = classify_interrupt(stage, &lower, &state.lexicon) {
        tracing::debug!(session_id = %session.id, stage = stage.as_str(), ?interrupt, "mid-flow interrupt");
        let aside = match interrupt {
            Interrupt::Hours => hours_answer(&state.clinic_hours()),
            Interrupt::Pricing => PRICING_ANSWER.to_string(),
            Interrupt::SymptomAside => {
                let animal = session.slots.animal.map(|a| a.as_str());
                let advice = state.symptom_advice(&text, animal).await;
                format!(
                    "I noticed a health concern — let me address that first! 🩺\n\n{advice}\n\n━━━━━━━━━━━━━━━━━━━━"
                )
            }
        };
        return TurnReply::text(prompts::back_to_booking(&aside, stage, &session.slots));
    }

    match stage {
        Stage::AskService => TurnReply::text(ask_service(state, session, &text, &lower).await),
        Stage::AskAnimal => TurnReply::text(ask_animal(state, session, &text).await),
        Stage::AskBreed => TurnReply::text(ask_breed(state, session, &text).await),
        Stage::AskPetName => TurnReply::text(ask_pet_name(state, session, &text).await),
        Stage::AskDatetime => TurnReply::text(ask_datetime(state, session, &text)),
        Stage::Confirm => confirm(state, session, &lower),
        Stage::Idle | Stage::Done => {
            tracing::warn!(session_id = %session.id, stage = stage.as_str(), "booking turn outside a booking");
            session.reset();
            TurnReply::text("Something went wrong. Let's start over — how can I help you today?")
        }
    }
}

async fn ask_service(state: &AppState, session: &mut Session, text: &str, lower: &str) -> String {
    let service = match state.lexicon.service_in(lower) {
        Some(service) => Some(service),
        None => {
            let prompt = format!(
                "Extract the vet service from this text: '{text}'. \
                 Choose ONE from: Consultation, Vaccination, Spay & Neuter, Deworming, Grooming. \
                 Return ONLY the service name."
            );
            Service::from_name(state.llm.complete_direct(&prompt).await.trim())
        }
    };

    let Some(service) = service else {
        return "I didn't catch that. Please choose one of:\n\
                Consultation, Vaccination, Spay & Neuter, Deworming, or Grooming."
            .to_string();
    };

    session.slots.service = Some(service);
    session.stage = Stage::AskAnimal;
    format!("Got it — {service}! 🐾\n\n{}", prompts::ANIMAL_QUESTION)
}

enum AnimalAnswer {
    Known(AnimalMention),
    Unsupported(String),
    Missing,
}

async fn ask_animal(state: &AppState, session: &mut Session, text: &str) -> String {
    let answer = match state.lexicon.animal_in(text) {
        Some(mention) => AnimalAnswer::Known(mention),
        None => match extract_entity(&state.llm, text, "animal species", None).await {
            None => AnimalAnswer::Missing,
            Some(name) => match Species::from_name(&name) {
                Some(species) => AnimalAnswer::Known(AnimalMention::Supported(species)),
                None if state.lexicon.is_wildlife(&name) => {
                    AnimalAnswer::Known(AnimalMention::Wildlife(name))
                }
                None => AnimalAnswer::Unsupported(name),
            },
        },
    };

    match answer {
        AnimalAnswer::Known(AnimalMention::Supported(species)) => {
            session.slots.animal = Some(species);
            session.stage = Stage::AskBreed;
            format!("A {species} — got it! 🐕\n\n{}", prompts::ask_breed(species.as_str()))
        }
        AnimalAnswer::Known(AnimalMention::Wildlife(name)) => {
            session.reset();
            format!(
                "🦁 Sorry, we don't handle {name}s. We only treat domestic and farm animals. \
                 Please contact a wildlife rescue center."
            )
        }
        AnimalAnswer::Unsupported(name) => format!(
            "We don't currently serve {name}s. {}\n\nWhat type of animal is your pet?",
            prompts::ACCEPTED_SPECIES
        ),
        AnimalAnswer::Missing => "I didn't catch the animal type. \
            Could you tell me what kind of pet it is? (e.g. Dog, Cat, Bird)"
            .to_string(),
    }
}

async fn ask_breed(state: &AppState, session: &mut Session, text: &str) -> String {
    let Some(species) = session.slots.animal else {
        session.stage = Stage::AskAnimal;
        return prompts::ANIMAL_QUESTION.to_string();
    };

    if state.lexicon.is_universal_breed(text) {
        session.slots.breed = Some("Unknown".to_string());
        session.stage = Stage::AskPetName;
        return "No problem! What's your pet's name?".to_string();
    }

    let breed = match state.lexicon.breed_match(species, text) {
        Some(entry) => title_case(entry),
        None => {
            let exclude = session.slots.pet_name.as_deref();
            let Some(candidate) = extract_entity(&state.llm, text, "breed", exclude).await else {
                return format!(
                    "I didn't catch a breed name. What breed is your {}? \
                     (Type 'unknown' or 'mixed' if you're not sure)",
                    species.as_str().to_lowercase()
                );
            };
            if !state
                .breeds
                .validate(&state.lexicon, &state.llm, &candidate, species)
                .await
            {
                return format!(
                    "'{candidate}' doesn't seem to be a {species} breed. \
                     Could you double-check? (Or type 'unknown' / 'mixed')"
                );
            }
            candidate
        }
    };

    let reply = format!("{breed} — lovely! 🐾\n\nWhat's your pet's name?");
    session.slots.breed = Some(breed);
    session.stage = Stage::AskPetName;
    reply
}

async fn ask_pet_name(state: &AppState, session: &mut Session, text: &str) -> String {
    let name = match PET_NAME_RE.captures(text).and_then(|c| c.get(1)) {
        Some(m) => Some(title_case(m.as_str())),
        None => extract_entity(&state.llm, text, "pet name", None).await,
    };

    let Some(name) = name.filter(|n| !is_none_marker(n)) else {
        return "What should I call your pet? Please enter their name.".to_string();
    };

    let reply = prompts::ask_datetime(
        &format!("Nice to meet {name}! 🐾"),
        &state.clinic_hours().to_human_readable(),
    );
    session.slots.pet_name = Some(name);
    session.stage = Stage::AskDatetime;
    reply
}

fn ask_datetime(state: &AppState, session: &mut Session, text: &str) -> String {
    match validate_datetime(text, state.clock.now(), state.clinic_hours()) {
        Ok(at) => {
            session.slots.datetime = Some(AppointmentTime::new(text, at));
            session.stage = Stage::Confirm;
            prompts::confirm_request("Almost done! Please confirm your appointment:", &session.slots)
        }
        Err(e) => {
            tracing::debug!(session_id = %session.id, error = %e, "datetime rejected");
            format!("⚠️ {e}\n\nPlease re-enter the date and time (e.g. 03/20/2026 10:00 AM).")
        }
    }
}

fn confirm(state: &AppState, session: &mut Session, lower: &str) -> TurnReply {
    if lower.contains("confirm") {
        return match commit_booking(session, state.ledger.as_ref()) {
            CommitOutcome::Booked { reply, record } => TurnReply {
                reply,
                booking: Some(record),
            },
            CommitOutcome::Incomplete { reply } => TurnReply::text(reply),
        };
    }

    if lower.contains("cancel") {
        session.reset();
        return TurnReply::text("Booking cancelled. Feel free to start a new conversation anytime! 🐾");
    }

    TurnReply::text("Please type 'confirm' to book your appointment, or 'cancel' to start over.")
}
