use once_cell::sync::Lazy;
use regex::Regex;

use super::interrupt::contains_any;
use super::prompts;
use crate::models::lexicon::AnimalMention;
use crate::models::{AppointmentTime, Service, Session, Slot, Species, Stage};
use crate::services::ai::extraction::{extract_entity, is_short_alpha, title_case};
use crate::services::sanitize::unescape_apostrophes;
use crate::services::scheduling::{validate_datetime, ClinicHours};
use crate::state::AppState;

const CORRECTION_MARKERS: &[&str] = &[
    "pala",
    "actually",
    "mali",
    "correction",
    "i meant",
    "i mean",
    "not a",
    "not my",
    "i made a mistake",
    "no wait",
    "oh wait",
    "pakipalitan",
    "ibig sabihin",
    "baguhin",
];

static NAME_CORRECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:name is|named|call (?:him|her|it|them)?|'s name is|siya si|pangalan|palitan|it'?s(?:\s+actually)?|its(?:\s+actually)?|the name is|correct name is|yung name(?:\s+is)?)\s+([A-Za-z][A-Za-z\-']*)",
    )
    .unwrap()
});

static MARKER_STRIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:oh wait|no wait|i made a mistake|not a|not my|pala|actually|mali|correction|i meant|i mean|pakipalitan|ibig sabihin|baguhin|it'?s|its|the name is|wait)\b",
    )
    .unwrap()
});

/// Words the name pattern can capture that are never a name.
const NOT_A_NAME: &[&str] = &["a", "an", "the", "my", "not", "actually"];

/// A revision of an already collected slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Correction {
    Service(Service),
    Wildlife(String),
    Animal(Species),
    Breed(String),
    PetName(String),
    Datetime(AppointmentTime),
}

pub fn is_correction(lower: &str) -> bool {
    contains_any(lower, CORRECTION_MARKERS)
}

/// Run the correction rules in priority order; the first that fires wins.
/// Returns `None` when the message is not a correction or no rule applies,
/// in which case normal stage handling takes over.
pub async fn detect_correction(state: &AppState, session: &Session, raw: &str) -> Option<Correction> {
    let text = unescape_apostrophes(raw);
    let lower = text.to_lowercase();
    let stage = session.stage;
    let slots = &session.slots;

    if !is_correction(&lower) || slots.is_empty() || !stage.at_or_past(Stage::AskAnimal) {
        return None;
    }

    if let Some(service) = state.lexicon.service_in(&lower) {
        return Some(Correction::Service(service));
    }

    if stage.at_or_past(Stage::AskBreed) {
        match animal_correction(state, &lower, slots.animal) {
            Some(AnimalMention::Wildlife(name)) => return Some(Correction::Wildlife(name)),
            Some(AnimalMention::Supported(species)) => return Some(Correction::Animal(species)),
            None => {}
        }

        if let Some(species) = slots.animal {
            if let Some(breed) =
                breed_correction(state, species, &text, slots.pet_name.as_deref()).await
            {
                return Some(Correction::Breed(breed));
            }
        }
    }

    if stage.at_or_past(Stage::AskPetName) {
        if let Some(name) = name_correction(&text) {
            return Some(Correction::PetName(name));
        }
    }

    if stage == Stage::Confirm {
        if let Ok(at) = validate_datetime(&text, state.clock.now(), state.clinic_hours()) {
            return Some(Correction::Datetime(AppointmentTime::new(&text, at)));
        }
    }

    None
}

/// The first species named that differs from the stored one, so "a cat, not
/// a dog" reads as Cat whichever order the lexicon lists them in.
fn animal_correction(state: &AppState, lower: &str, current: Option<Species>) -> Option<AnimalMention> {
    let named = state.lexicon.species_in_order(lower);
    if let Some(species) = named
        .iter()
        .copied()
        .find(|s| Some(*s) != current)
        .or_else(|| named.first().copied())
    {
        return Some(AnimalMention::Supported(species));
    }
    state
        .lexicon
        .wildlife_in(lower)
        .map(|w| AnimalMention::Wildlife(w.to_string()))
}

async fn breed_correction(
    state: &AppState,
    species: Species,
    text: &str,
    pet_name: Option<&str>,
) -> Option<String> {
    if let Some(entry) = state.lexicon.breed_named_in(species, text) {
        return Some(title_case(entry));
    }

    let remainder = strip_markers(text);
    if remainder.is_empty() {
        return None;
    }
    let candidate = extract_entity(&state.llm, &remainder, "breed", pet_name).await?;
    state
        .breeds
        .validate(&state.lexicon, &state.llm, &candidate, species)
        .await
        .then_some(candidate)
}

/// "it's actually Max", "the name is Max", or a bare "oh wait, Max".
pub fn name_correction(text: &str) -> Option<String> {
    let structured = NAME_CORRECTION_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .find(|w| !NOT_A_NAME.contains(&w.to_lowercase().as_str()));
    if let Some(name) = structured {
        return Some(title_case(name));
    }

    let remainder = strip_markers(text);
    let words: Vec<&str> = remainder.split_whitespace().collect();
    match words.as_slice() {
        [word] if is_short_alpha(word) => Some(title_case(word)),
        _ => None,
    }
}

/// Drop correction markers and filler punctuation, leaving what was being corrected.
fn strip_markers(text: &str) -> String {
    let stripped = MARKER_STRIP_RE.replace_all(text, " ");
    stripped
        .replace([',', '!', '?', '.'], " ")
        .split_whitespace()
        .filter(|w| *w != "'")
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write the correction into the session and build the reply. Upstream
/// corrections clear everything after them; downstream ones clear only
/// themselves and later slots.
pub fn apply_correction(session: &mut Session, correction: Correction, hours: &ClinicHours) -> String {
    let hours = hours.to_human_readable();
    let slots = &mut session.slots;

    match correction {
        Correction::Service(service) => {
            slots.service = Some(service);
            slots.clear_from(Slot::Animal);
            session.stage = Stage::AskAnimal;
            format!(
                "No worries! Service updated to {service}.\n\n{}",
                prompts::ANIMAL_QUESTION
            )
        }
        Correction::Wildlife(name) => {
            session.reset();
            format!("🦁 Sorry, we don't handle {name}s. Please contact a wildlife rescue center.")
        }
        Correction::Animal(species) => {
            slots.animal = Some(species);
            slots.clear_from(Slot::Breed);
            session.stage = Stage::AskBreed;
            format!(
                "Updated! So it's a {species}.\n\n{}",
                prompts::ask_breed(species.as_str())
            )
        }
        Correction::Breed(breed) => {
            slots.breed = Some(breed.clone());
            slots.clear_from(Slot::Datetime);
            match slots.pet_name.clone() {
                Some(name) => {
                    session.stage = Stage::AskDatetime;
                    prompts::ask_datetime(
                        &format!("Breed corrected to {breed}! 🐾\n\nKeeping the name as {name}."),
                        &hours,
                    )
                }
                None => {
                    session.stage = Stage::AskPetName;
                    format!("Breed corrected to {breed}! 🐾\n\nWhat's your pet's name?")
                }
            }
        }
        Correction::PetName(name) => {
            slots.pet_name = Some(name.clone());
            slots.clear_from(Slot::Datetime);
            session.stage = Stage::AskDatetime;
            prompts::ask_datetime(&format!("Got it — name updated to {name}! 🐾"), &hours)
        }
        Correction::Datetime(at) => {
            slots.datetime = Some(at);
            prompts::confirm_request("Schedule updated! Here's your revised appointment:", slots)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Slots;
    use crate::testing::{booked_slots, test_state, ScriptedLlm};

    fn session_at(stage: Stage, slots: Slots) -> Session {
        let mut s = Session::new("t".to_string());
        s.stage = stage;
        s.slots = slots;
        s
    }

    #[test]
    fn test_marker_vocabulary() {
        assert!(is_correction("actually it's a cat"));
        assert!(is_correction("no wait, grooming"));
        assert!(is_correction("vaccination pala"));
        assert!(!is_correction("grooming please"));
    }

    #[test]
    fn test_name_patterns() {
        assert_eq!(name_correction("actually it's Max").as_deref(), Some("Max"));
        assert_eq!(name_correction("the name is luna").as_deref(), Some("Luna"));
        assert_eq!(name_correction("oh wait, nnao").as_deref(), Some("Nnao"));
        assert_eq!(name_correction("actually it's a big dog"), None);
        assert_eq!(name_correction("actually no idea"), None);
    }

    #[test]
    fn test_strip_markers() {
        assert_eq!(strip_markers("oh wait, it's Bruno!"), "Bruno");
        assert_eq!(strip_markers("actually"), "");
    }

    #[tokio::test]
    async fn test_service_correction_wins_first() {
        let state = test_state(ScriptedLlm::none());
        let session = session_at(Stage::AskDatetime, booked_slots());
        let got = detect_correction(&state, &session, "actually I meant grooming").await;
        assert_eq!(got, Some(Correction::Service(Service::Grooming)));
    }

    #[tokio::test]
    async fn test_no_rules_before_animal_stage() {
        let state = test_state(ScriptedLlm::none());
        let mut slots = Slots::default();
        slots.service = Some(Service::Vaccination);
        let session = session_at(Stage::AskService, slots);
        assert_eq!(detect_correction(&state, &session, "actually grooming").await, None);
    }

    #[tokio::test]
    async fn test_animal_and_wildlife_corrections() {
        let state = test_state(ScriptedLlm::none());
        let session = session_at(Stage::AskPetName, booked_slots());
        assert_eq!(
            detect_correction(&state, &session, "oh wait it's a cat").await,
            Some(Correction::Animal(Species::Cat))
        );
        assert_eq!(
            detect_correction(&state, &session, "actually it's a tiger").await,
            Some(Correction::Wildlife("Tiger".to_string()))
        );
    }

    #[tokio::test]
    async fn test_animal_correction_prefers_the_new_species() {
        let state = test_state(ScriptedLlm::none());
        let session = session_at(Stage::AskDatetime, booked_slots());
        assert_eq!(
            detect_correction(&state, &session, "actually my pet is a cat, not a dog").await,
            Some(Correction::Animal(Species::Cat))
        );
        assert_eq!(
            detect_correction(&state, &session, "not a dog, a rabbit").await,
            Some(Correction::Animal(Species::Rabbit))
        );
    }

    #[tokio::test]
    async fn test_breed_correction_from_lexicon() {
        let state = test_state(ScriptedLlm::none());
        let session = session_at(Stage::Confirm, booked_slots());
        assert_eq!(
            detect_correction(&state, &session, "actually he is a beagle").await,
            Some(Correction::Breed("Beagle".to_string()))
        );
    }

    #[tokio::test]
    async fn test_breed_correction_via_llm_validation() {
        let state = test_state(ScriptedLlm::new(|prompt| {
            if prompt.contains("breed validator") {
                "yes".to_string()
            } else {
                "None".to_string()
            }
        }));
        let session = session_at(Stage::AskDatetime, booked_slots());
        assert_eq!(
            detect_correction(&state, &session, "actually kooikerhondje").await,
            Some(Correction::Breed("Kooikerhondje".to_string()))
        );
    }

    #[tokio::test]
    async fn test_name_correction_when_breed_rejected() {
        let state = test_state(ScriptedLlm::none());
        let session = session_at(Stage::Confirm, booked_slots());
        assert_eq!(
            detect_correction(&state, &session, "actually it's Max").await,
            Some(Correction::PetName("Max".to_string()))
        );
    }

    #[tokio::test]
    async fn test_datetime_correction_at_confirm_only() {
        let state = test_state(ScriptedLlm::none());
        let session = session_at(Stage::Confirm, booked_slots());
        let got = detect_correction(&state, &session, "actually 03/21/2026 11:00 AM").await;
        match got {
            Some(Correction::Datetime(t)) => assert_eq!(t.display(), "03/21/2026 11:00 AM"),
            other => panic!("expected datetime correction, got {other:?}"),
        }
    }

    #[test]
    fn test_apply_service_clears_downstream() {
        let mut session = session_at(Stage::AskDatetime, booked_slots());
        let reply = apply_correction(
            &mut session,
            Correction::Service(Service::Grooming),
            &ClinicHours::default(),
        );
        assert_eq!(session.stage, Stage::AskAnimal);
        assert_eq!(session.slots.service, Some(Service::Grooming));
        assert!(session.slots.animal.is_none());
        assert!(session.slots.breed.is_none());
        assert!(session.slots.pet_name.is_none());
        assert!(session.slots.datetime.is_none());
        assert!(reply.contains("Service updated to Grooming"));
    }

    #[test]
    fn test_apply_name_keeps_upstream() {
        let mut session = session_at(Stage::Confirm, booked_slots());
        apply_correction(&mut session, Correction::PetName("Max".to_string()), &ClinicHours::default());
        assert_eq!(session.stage, Stage::AskDatetime);
        assert_eq!(session.slots.service, Some(Service::Vaccination));
        assert_eq!(session.slots.animal, Some(Species::Dog));
        assert_eq!(session.slots.breed.as_deref(), Some("Aspin"));
        assert_eq!(session.slots.pet_name.as_deref(), Some("Max"));
        assert!(session.slots.datetime.is_none());
    }

    #[test]
    fn test_apply_breed_without_name_asks_name() {
        let mut slots = booked_slots();
        slots.pet_name = None;
        slots.datetime = None;
        let mut session = session_at(Stage::AskPetName, slots);
        let reply = apply_correction(&mut session, Correction::Breed("Poodle".to_string()), &ClinicHours::default());
        assert_eq!(session.stage, Stage::AskPetName);
        assert!(reply.ends_with("What's your pet's name?"));
    }

    #[test]
    fn test_apply_wildlife_resets() {
        let mut session = session_at(Stage::Confirm, booked_slots());
        apply_correction(&mut session, Correction::Wildlife("Bear".to_string()), &ClinicHours::default());
        assert_eq!(session.stage, Stage::Idle);
        assert!(session.slots.is_empty());
    }
}
