use once_cell::sync::Lazy;
use regex::Regex;

use super::CompletionService;

static ALPHA_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\-']+$").unwrap());

/// Labels small models like to echo in front of the answer.
const RESPONSE_PREFIXES: [&str; 8] = [
    "output:", "answer:", "result:", "entity:", "breed:", "species:", "name:", "animal:",
];

/// Resolve a slot value from free text.
///
/// Short alphabetic input (one to three words) is taken verbatim; anything
/// longer goes through the completion service. `None` means the caller
/// should re-prompt.
pub async fn extract_entity(
    llm: &CompletionService,
    input: &str,
    entity_type: &str,
    exclude: Option<&str>,
) -> Option<String> {
    let input = input.trim();
    if is_short_alpha(input) {
        return Some(title_case(input));
    }

    let exclude_note = exclude
        .map(|name| {
            format!("\n5. Do NOT return \"{name}\" — that is the pet's name, not the {entity_type}.")
        })
        .unwrap_or_default();

    let prompt = format!(
        "TASK: Extract the {entity_type} from the user's input.\n\
         USER INPUT: \"{input}\"\n\
         RULES:\n\
         1. Return ONLY the {entity_type} (no extra words).\n\
         2. If a correction is present (e.g. \"Wait no it's Coco\"), extract the corrected value.\n\
         3. If no valid {entity_type} found, return \"None\".\n\
         4. Remove punctuation. Use Title Case (e.g. \"Persian\", not \"PERSIAN\").{exclude_note}\n\
         Output:"
    );

    let raw = llm.complete_direct(&prompt).await;
    let cleaned = title_case(&clean_extracted(&raw.replace(['"', '\''], "")));
    tracing::debug!(entity_type, raw = %raw, cleaned = %cleaned, "entity extraction");

    if is_none_marker(&cleaned) {
        None
    } else {
        Some(cleaned)
    }
}

/// A literal "None"/"null" or an empty answer means nothing was found.
pub fn is_none_marker(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("null")
}

/// One to three whitespace-separated words made only of letters, hyphens and apostrophes.
pub fn is_short_alpha(input: &str) -> bool {
    let words: Vec<&str> = input.split_whitespace().collect();
    (1..=3).contains(&words.len()) && words.iter().all(|w| ALPHA_WORD.is_match(w))
}

/// Strip echoed labels and surrounding punctuation from a model answer.
pub fn clean_extracted(text: &str) -> String {
    let mut text = text.replace(['\n', '\r'], " ").trim().to_string();

    let mut changed = true;
    while changed {
        changed = false;
        for prefix in RESPONSE_PREFIXES {
            if text.to_lowercase().starts_with(prefix) {
                text = text[prefix.len()..].trim().to_string();
                changed = true;
            }
        }
    }

    let text = text.trim_matches(|c| "\"'.,;:()[]".contains(c));
    let words: Vec<&str> = text.split_whitespace().collect();
    match words.len() {
        0 => String::new(),
        1..=3 => words.join(" "),
        _ => words[0].to_string(),
    }
}

pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
