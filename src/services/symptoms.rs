use std::collections::HashSet;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub disease: String,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymptomMatch {
    pub matched: Option<Condition>,
    /// Similarity in `[0, 1]`.
    pub score: f32,
}

impl SymptomMatch {
    pub fn none() -> Self {
        Self {
            matched: None,
            score: 0.0,
        }
    }

    /// The matched condition, if its score clears `threshold`.
    pub fn reliable(&self, threshold: f32) -> Option<&Condition> {
        self.matched.as_ref().filter(|_| self.score >= threshold)
    }
}

#[async_trait]
pub trait SymptomMatcher: Send + Sync {
    async fn match_symptom(&self, query: &str, animal: Option<&str>) -> SymptomMatch;

    fn is_ready(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeEntry {
    pub animal: String,
    pub symptoms: Vec<String>,
    pub disease: String,
    #[serde(default)]
    pub dangerous: bool,
}

/// Bag-of-words cosine similarity over a small symptom knowledge base.
/// Stands in for an embedding model; the scoring contract is the same.
pub struct LexicalSymptomMatcher {
    entries: Vec<(KnowledgeEntry, HashSet<String>)>,
}

impl LexicalSymptomMatcher {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| {
                let text = format!("{} {}", e.animal, e.symptoms.join(" "));
                let tokens = tokenize(&text);
                (e, tokens)
            })
            .collect();
        Self { entries }
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read symptom knowledge base {path}"))?;
        let entries: Vec<KnowledgeEntry> =
            serde_json::from_str(&raw).context("failed to parse symptom knowledge base")?;
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SymptomMatcher for LexicalSymptomMatcher {
    async fn match_symptom(&self, query: &str, animal: Option<&str>) -> SymptomMatch {
        let mut query_tokens = tokenize(query);
        if let Some(animal) = animal {
            query_tokens.extend(tokenize(animal));
        }
        if query_tokens.is_empty() {
            return SymptomMatch::none();
        }

        let best = self
            .entries
            .iter()
            .map(|(entry, tokens)| (entry, cosine(&query_tokens, tokens)))
            .max_by(|a, b| a.1.total_cmp(&b.1));

        match best {
            Some((entry, score)) if score > 0.0 => SymptomMatch {
                matched: Some(Condition {
                    disease: entry.disease.clone(),
                    advice: if entry.dangerous {
                        "⚠️ URGENT: Visit vet immediately.".to_string()
                    } else {
                        "Monitor closely.".to_string()
                    },
                }),
                score,
            },
            _ => SymptomMatch::none(),
        }
    }

    fn is_ready(&self) -> bool {
        !self.entries.is_empty()
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| t.len() >= 3)
        .map(str::to_string)
        .collect()
}

fn cosine(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count() as f32;
    shared / ((a.len() * b.len()) as f32).sqrt()
}

/// Prompt for a short advisory reply, anchored to the animal the owner has.
pub fn symptom_prompt(raw: &str, found: &SymptomMatch, threshold: f32, animal: Option<&str>) -> String {
    let subject = animal.unwrap_or("the pet");

    match found.reliable(threshold) {
        Some(condition) => format!(
            "The user has a {subject}. They report: {raw}. \
             The closest matching condition in the knowledge base is: {}. \
             Write a 2-3 sentence professional response addressed specifically to a {subject} owner. \
             Note: {} \
             Do NOT mention any other animal species. Only refer to the {subject}.",
            condition.disease, condition.advice
        ),
        None => format!(
            "The user has a {subject}. They say: '{raw}'. \
             Give a 2-3 sentence professional veterinary response about these symptoms in a {subject}. \
             Do NOT mention any other animal species. Only refer to the {subject}. \
             End with 'Only a licensed veterinarian can confirm the exact cause.'"
        ),
    }
}
