//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::config::AppConfig;
use crate::models::{AppointmentTime, Lexicon, Service, Slots, Species};
use crate::services::ai::{LlmProvider, Message};
use crate::services::ledger::HashLedger;
use crate::services::scheduling::FixedClock;
use crate::services::symptoms::LexicalSymptomMatcher;
use crate::state::AppState;

type Script = dyn Fn(&str) -> String + Send + Sync;

/// Answers every prompt through a closure over the last user message.
pub struct ScriptedLlm {
    script: Box<Script>,
}

impl ScriptedLlm {
    pub fn new(script: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
        }
    }

    /// Finds nothing and validates nothing.
    pub fn none() -> Self {
        Self::new(|_| "None".to_string())
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn chat(&self, _system_prompt: &str, messages: &[Message]) -> anyhow::Result<String> {
        let prompt = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        Ok((self.script)(prompt))
    }
}

pub fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2026-01-10 09:00", "%Y-%m-%d %H:%M").unwrap()
}

pub fn test_state(llm: ScriptedLlm) -> AppState {
    test_state_with_cooldown(llm, Duration::ZERO)
}

pub fn test_state_with_cooldown(llm: ScriptedLlm, cooldown: Duration) -> AppState {
    let config = AppConfig {
        rate_limit: cooldown,
        llm_timeout: Duration::from_secs(1),
        ..AppConfig::default()
    };
    AppState::new(
        config,
        Lexicon::builtin().unwrap(),
        Arc::new(llm),
        Box::new(LexicalSymptomMatcher::new(Vec::new())),
        Box::new(HashLedger),
        Box::new(FixedClock(now())),
    )
}

/// Every slot filled, as it stands when the confirm stage is reached.
pub fn booked_slots() -> Slots {
    let at = NaiveDateTime::parse_from_str("2026-03-20 10:00", "%Y-%m-%d %H:%M").unwrap();
    Slots {
        service: Some(Service::Vaccination),
        animal: Some(Species::Dog),
        breed: Some("Aspin".to_string()),
        pet_name: Some("Coco".to_string()),
        datetime: Some(AppointmentTime::new("03/20/2026 10:00 AM", at)),
    }
}
