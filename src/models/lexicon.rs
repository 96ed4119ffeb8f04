use std::collections::HashMap;

use anyhow::Context;
use serde::Deserialize;

use super::booking::{Service, Species};
use crate::errors::AppError;

static BUILTIN_LEXICON: &str = include_str!("../../data/lexicon.json");

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceKeyword {
    pub keyword: String,
    pub service: Service,
}

/// Species, breed and service vocabulary. Loaded once at startup; every
/// lookup on it is pure.
#[derive(Debug, Clone, Deserialize)]
pub struct Lexicon {
    pub wildlife: Vec<String>,
    pub universal_breeds: Vec<String>,
    pub service_keywords: Vec<ServiceKeyword>,
    pub breeds: HashMap<Species, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnimalMention {
    Supported(Species),
    Wildlife(String),
}

impl Lexicon {
    pub fn builtin() -> Result<Self, AppError> {
        Self::from_json(BUILTIN_LEXICON)
    }

    pub fn from_json(s: &str) -> Result<Self, AppError> {
        let mut lexicon: Lexicon =
            serde_json::from_str(s).map_err(|e| AppError::Config(format!("lexicon: {e}")))?;

        if lexicon.service_keywords.is_empty() {
            return Err(AppError::Config("lexicon has no service keywords".to_string()));
        }

        lexicon.universal_breeds = lexicon
            .universal_breeds
            .iter()
            .map(|b| b.trim().to_lowercase())
            .collect();
        for entries in lexicon.breeds.values_mut() {
            for entry in entries.iter_mut() {
                *entry = entry.trim().to_lowercase();
            }
        }
        Ok(lexicon)
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lexicon file {path}"))?;
        Ok(Self::from_json(&raw)?)
    }

    /// First service whose keyword appears anywhere in `lower`.
    pub fn service_in(&self, lower: &str) -> Option<Service> {
        self.service_keywords
            .iter()
            .find(|k| lower.contains(k.keyword.as_str()))
            .map(|k| k.service)
    }

    /// Species named in the text as a whole word (plural allowed). Supported
    /// species are checked before wildlife.
    pub fn animal_in(&self, text: &str) -> Option<AnimalMention> {
        let lower = text.to_lowercase();
        if let Some(species) = Species::ALL
            .into_iter()
            .find(|sp| mentions_word(&lower, &sp.as_str().to_lowercase()))
        {
            return Some(AnimalMention::Supported(species));
        }
        self.wildlife_in(&lower)
            .map(|w| AnimalMention::Wildlife(w.to_string()))
    }

    /// Supported species in the order the text names them, without repeats.
    pub fn species_in_order(&self, text: &str) -> Vec<Species> {
        let lower = text.to_lowercase();
        let mut found = Vec::new();
        for token in words(&lower) {
            let species = Species::ALL
                .into_iter()
                .find(|sp| mentions_word(token, &sp.as_str().to_lowercase()));
            if let Some(species) = species {
                if !found.contains(&species) {
                    found.push(species);
                }
            }
        }
        found
    }

    /// Wildlife named anywhere in the text, even alongside a supported species.
    pub fn wildlife_in(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.wildlife
            .iter()
            .find(|w| mentions_word(&lower, &w.to_lowercase()))
            .map(String::as_str)
    }

    pub fn is_wildlife(&self, name: &str) -> bool {
        self.wildlife.iter().any(|w| w.eq_ignore_ascii_case(name.trim()))
    }

    pub fn is_universal_breed(&self, breed: &str) -> bool {
        let breed = breed.trim().to_lowercase();
        self.universal_breeds.iter().any(|u| *u == breed)
    }

    pub fn breeds_for(&self, species: Species) -> &[String] {
        self.breeds.get(&species).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Lexicon entry that contains, or is contained in, the text. Fragments
    /// shorter than four letters only match whole entries.
    pub fn breed_match(&self, species: Species, text: &str) -> Option<&str> {
        let lower = text.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        let allow_fragment = lower.chars().count() >= 4;
        self.breeds_for(species)
            .iter()
            .find(|w| lower.contains(w.as_str()) || (allow_fragment && w.contains(lower.as_str())))
            .map(String::as_str)
    }

    /// Lexicon entry appearing as a whole phrase inside a longer sentence.
    pub fn breed_named_in(&self, species: Species, text: &str) -> Option<&str> {
        let padded = format!(" {} ", words(&text.to_lowercase()).join(" "));
        self.breeds_for(species)
            .iter()
            .find(|w| padded.contains(&format!(" {} ", words(w).join(" "))))
            .map(String::as_str)
    }
}

fn words(lower: &str) -> Vec<&str> {
    lower
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
        .collect()
}

fn mentions_word(lower: &str, word: &str) -> bool {
    lower
        .split(|c: char| !c.is_alphabetic())
        .any(|token| token == word || token.strip_suffix('s') == Some(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        Lexicon::builtin().unwrap()
    }

    #[test]
    fn test_builtin_covers_every_species() {
        let lex = lexicon();
        for species in Species::ALL {
            assert!(
                !lex.breeds_for(species).is_empty(),
                "no breeds for {species}"
            );
        }
    }

    #[test]
    fn test_service_keywords() {
        let lex = lexicon();
        assert_eq!(lex.service_in("i need a checkup"), Some(Service::Consultation));
        assert_eq!(lex.service_in("pa-kapon po"), Some(Service::SpayNeuter));
        assert_eq!(lex.service_in("hello there"), None);
    }

    #[test]
    fn test_animal_whole_word_match() {
        let lex = lexicon();
        assert_eq!(lex.animal_in("My Dog"), Some(AnimalMention::Supported(Species::Dog)));
        assert_eq!(lex.animal_in("two cattle"), Some(AnimalMention::Supported(Species::Cattle)));
        assert_eq!(lex.animal_in("cats"), Some(AnimalMention::Supported(Species::Cat)));
        assert_eq!(lex.animal_in("when is it"), None);
        assert_eq!(
            lex.animal_in("a tiger"),
            Some(AnimalMention::Wildlife("Tiger".to_string()))
        );
    }

    #[test]
    fn test_breed_match_either_direction() {
        let lex = lexicon();
        assert_eq!(lex.breed_match(Species::Dog, "Aspin"), Some("aspin"));
        assert_eq!(lex.breed_match(Species::Dog, "my golden retriever"), Some("golden retriever"));
        assert_eq!(lex.breed_match(Species::Cat, "persi"), Some("persian"));
        assert_eq!(lex.breed_match(Species::Cat, ""), None);
        assert_eq!(lex.breed_match(Species::Dog, "bo"), None);
    }

    #[test]
    fn test_species_in_order_follows_the_text() {
        let lex = lexicon();
        assert_eq!(
            lex.species_in_order("my pet is a cat, not a dog"),
            vec![Species::Cat, Species::Dog]
        );
        assert_eq!(lex.species_in_order("two dogs and a dog"), vec![Species::Dog]);
        assert!(lex.species_in_order("a tiger").is_empty());
    }

    #[test]
    fn test_wildlife_alongside_pet() {
        let lex = lexicon();
        assert_eq!(lex.wildlife_in("my dog saw two foxes"), Some("Fox"));
        assert_eq!(lex.wildlife_in("my dog"), None);
    }

    #[test]
    fn test_breed_named_in_needs_whole_words() {
        let lex = lexicon();
        assert_eq!(lex.breed_named_in(Species::Dog, "actually he's a Shih-Tzu"), Some("shih tzu"));
        assert_eq!(lex.breed_named_in(Species::Dog, "his name is jason"), None);
    }

    #[test]
    fn test_rejects_lexicon_without_services() {
        let err = Lexicon::from_json(
            r#"{"wildlife":[],"universal_breeds":[],"service_keywords":[],"breeds":{}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
