use crate::models::{Lexicon, Stage};
use crate::services::scheduling::{has_date_token, ClinicHours};

const HOURS_KEYWORDS: &[&str] = &["clinic hour", "anong oras", "open", "bukas", "close", "sarado"];

const PRICING_KEYWORDS: &[&str] = &["how much", "magkano", "price", "cost", "presyo"];

/// Health concerns and "by the way" markers that flag an aside. Wider than
/// the idle symptom-screening list.
const ASIDE_KEYWORDS: &[&str] = &[
    "scratching",
    "vomit",
    "diarrhea",
    "not eating",
    "ayaw kumain",
    "sick",
    "matamlay",
    "may sakit",
    "nagsusuka",
    "lethargic",
    "lethargy",
    "coughing",
    "sneezing",
    "wound",
    "rash",
    "hindi kumakain",
    "laging tulog",
    "itchy",
    "swollen",
    "limping",
    "hiccup",
    "shaking",
    "trembling",
    "nagtatae",
    "btw",
    "by the way",
    "sa totoo lang",
    "actually my",
    "also my",
    "my dog has",
    "my cat has",
    "my pet has",
];

pub fn hours_answer(hours: &ClinicHours) -> String {
    format!("🕐 We're open Mon–Sat: {}. Sunday: Closed.", hours.to_human_readable())
}

pub const PRICING_ANSWER: &str =
    "💰 Pricing varies per procedure. Please call the clinic for exact rates.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Hours,
    Pricing,
    SymptomAside,
}

/// Ordered checks for a message that should be answered without moving the
/// booking forward. `lower` is the lowercased sanitized text.
pub fn classify_interrupt(stage: Stage, lower: &str, lexicon: &Lexicon) -> Option<Interrupt> {
    if contains_any(lower, HOURS_KEYWORDS) {
        return Some(Interrupt::Hours);
    }
    if contains_any(lower, PRICING_KEYWORDS) {
        return Some(Interrupt::Pricing);
    }
    if contains_any(lower, ASIDE_KEYWORDS) && !is_direct_answer(stage, lower, lexicon) {
        return Some(Interrupt::SymptomAside);
    }
    None
}

/// Whether the message reads as an answer to the current stage's question.
pub fn is_direct_answer(stage: Stage, lower: &str, lexicon: &Lexicon) -> bool {
    lower.contains("confirm")
        || lower.contains("cancel")
        || has_date_token(lower)
        || matches!(stage, Stage::AskBreed | Stage::AskPetName)
        || (stage == Stage::AskService && lexicon.service_in(lower).is_some())
}

pub(crate) fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| lower.contains(kw))
}
