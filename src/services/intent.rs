use crate::models::lexicon::AnimalMention;
use crate::models::{Intent, Lexicon, Session, Stage};
use crate::services::booking_flow::interrupt::contains_any;
use crate::services::booking_flow::prompts::SERVICE_MENU;
use crate::services::conversation::TurnReply;
use crate::services::sanitize::unescape_apostrophes;
use crate::state::AppState;

const BOOKING_KEYWORDS: &[&str] = &[
    "book",
    "appointment",
    "schedule",
    "magpa-check",
    "gusto",
    "punta",
    "i want to",
];

/// Short affirmatives only count as whole words ("oo" would match "food").
const BOOKING_AFFIRMATIVES: &[&str] = &["yes", "oo", "sige", "sure"];

const HOURS_KEYWORDS: &[&str] = &["hour", "open", "close", "oras", "bukas"];

const SERVICE_KEYWORDS: &[&str] = &["service", "offer", "serbisyo", "magkano", "price", "cost"];

const CANCEL_KEYWORDS: &[&str] = &["cancel", "reschedule", "move", "change appointment"];

const SYMPTOM_KEYWORDS: &[&str] = &[
    "check symptom",
    "symptoms",
    "my pet is",
    "my dog is",
    "my cat is",
    "not eating",
    "sick",
    "ayaw kumain",
    "matamlay",
    "may sakit",
    "nagsusuka",
    "vomit",
    "diarrhea",
    "limp",
    "lethargy",
    "wound",
    "rash",
    "coughing",
    "sneezing",
    "scratch",
    "laging tulog",
    "hindi kumakain",
];

const BARE_SYMPTOM_REQUESTS: &[&str] = &["check symptom", "check symptoms", "symptoms", "symptom"];

const SERVICES_ANSWER: &str = "🏥 We offer the following services:\n\n\
• Consultation — bring medical records\n\
• Vaccination — anti-rabies, 5-in-1, Parvo\n\
• Spay & Neuter — fasting required (8–12 hrs)\n\
• Deworming — every 2 weeks for puppies\n\
• Grooming — inform us if your pet is aggressive\n\n\
Would you like to book an appointment?";

const CANCEL_ANSWER: &str = "To cancel or reschedule, please go to the My Appointments tab \
in the sidebar and select the appointment you'd like to modify. \
You can also call our clinic directly during business hours.";

const DESCRIBE_SYMPTOMS: &str = "Sure! Please describe your pet's symptoms and I'll help assess them.\n\n\
For example: 'My dog has been vomiting for 2 days' or \
'My cat is not eating and seems lethargic.'";

const BOOKING_NUDGE: &str = "\n\nWould you like to book a consultation? \
Just say 'yes' or 'book an appointment' and I'll get you started. 🐾";

/// First matching intent in a fixed priority order. `lower` is the
/// lowercased sanitized message.
pub fn classify_intent(lower: &str, lexicon: &Lexicon) -> Intent {
    if contains_any(lower, BOOKING_KEYWORDS) || has_word(lower, BOOKING_AFFIRMATIVES) {
        return Intent::Book;
    }
    if contains_any(lower, HOURS_KEYWORDS) {
        return Intent::AskHours;
    }
    if contains_any(lower, SERVICE_KEYWORDS) {
        return Intent::AskServices;
    }
    if contains_any(lower, CANCEL_KEYWORDS) {
        return Intent::CancelInfo;
    }
    if contains_any(lower, SYMPTOM_KEYWORDS) {
        return Intent::SymptomScreen;
    }
    if let Some(name) = lexicon.wildlife_in(lower) {
        return Intent::Wildlife(name.to_string());
    }
    Intent::Fallback
}

fn has_word(lower: &str, words: &[&str]) -> bool {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| words.contains(&token))
}

/// Reply to a message from a session with no booking in progress.
pub async fn handle_idle(state: &AppState, session: &mut Session, raw: &str) -> TurnReply {
    let text = unescape_apostrophes(raw);
    let lower = text.to_lowercase();
    let intent = classify_intent(&lower, &state.lexicon);
    tracing::info!(session_id = %session.id, intent = intent.as_str(), "idle message routed");

    let reply = match intent {
        Intent::Book => {
            session.slots.clear();
            session.stage = Stage::AskService;
            format!("I'd be happy to help you book an appointment! 🐾\n\n{SERVICE_MENU}")
        }
        Intent::AskHours => format!(
            "🕐 Clinic Hours:\nMonday – Saturday: {}\nSunday: Closed\n\n\
             Appointments outside these hours cannot be booked.",
            state.clinic_hours().to_human_readable()
        ),
        Intent::AskServices => SERVICES_ANSWER.to_string(),
        Intent::CancelInfo => CANCEL_ANSWER.to_string(),
        Intent::SymptomScreen => {
            if BARE_SYMPTOM_REQUESTS.contains(&lower.trim()) {
                DESCRIBE_SYMPTOMS.to_string()
            } else {
                let animal = match state.lexicon.animal_in(&text) {
                    Some(AnimalMention::Supported(species)) => Some(species.as_str()),
                    _ => None,
                };
                let advice = state.symptom_advice(&text, animal).await;
                format!("{advice}{BOOKING_NUDGE}")
            }
        }
        Intent::Wildlife(name) => format!(
            "🦁 We're a domestic and farm animal clinic — we don't handle {name}s. \
             Please contact a wildlife rescue center or zoo veterinarian."
        ),
        Intent::Fallback => state.llm.complete_text(&text, true).await,
    };

    TurnReply::text(reply)
}
