use std::collections::HashMap;

use parking_lot::Mutex;

use crate::models::{Lexicon, Species};
use crate::services::ai::CompletionService;

/// Three-layer breed check: universal terms, the species lexicon, then a
/// yes/no question to the completion service. Layer-three answers are cached
/// for the life of the process.
#[derive(Default)]
pub struct BreedValidator {
    cache: Mutex<HashMap<(Species, String), bool>>,
}

impl BreedValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn validate(
        &self,
        lexicon: &Lexicon,
        llm: &CompletionService,
        breed: &str,
        species: Species,
    ) -> bool {
        let key = breed.trim().to_lowercase();
        if key.is_empty() {
            return false;
        }

        if lexicon.is_universal_breed(&key) || lexicon.breed_match(species, &key).is_some() {
            return true;
        }

        if let Some(&known) = self.cache.lock().get(&(species, key.clone())) {
            return known;
        }

        let answer = llm.complete_direct(&breed_prompt(breed.trim(), species)).await;
        let answer = answer.trim().to_lowercase();
        let valid = answer == "yes";
        tracing::debug!(breed = %key, species = %species, answer = %answer, valid, "breed check via completion");

        // Fallback text from an unreachable provider is not an answer.
        if valid || answer == "no" {
            self.cache.lock().insert((species, key), valid);
        }
        valid
    }
}

fn breed_prompt(breed: &str, species: Species) -> String {
    format!(
        "You are a veterinary breed validator.\n\
         Is \"{breed}\" a recognized or commonly known breed, variety, or type of {species}?\n\
         NOTE: Philippine local breeds are valid, e.g. \"Aspin\" (Asong Pinoy) for dogs, \
         \"Puspin\" (Pusang Pinoy) for cats, \"Carabao\" for buffalo, \"Bisaya\" pigs and chickens.\n\
         Answer ONLY \"yes\" or \"no\". Do not explain.\n\
         Answer \"yes\" only if it is a real {species} breed or type.\n\
         Answer \"no\" for any other animal, random word, food, place, or nonsense.\n\
         Answer:"
    )
}
