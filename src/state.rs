use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::Lexicon;
use crate::services::ai::{CompletionService, LlmProvider};
use crate::services::breed::BreedValidator;
use crate::services::ledger::TransactionLedger;
use crate::services::rate_limit::RateLimiter;
use crate::services::scheduling::{ClinicHours, Clock};
use crate::services::symptoms::{symptom_prompt, SymptomMatch, SymptomMatcher};
use crate::store::SessionStore;

pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionStore,
    pub lexicon: Lexicon,
    pub llm: CompletionService,
    pub breeds: BreedValidator,
    pub symptoms: Box<dyn SymptomMatcher>,
    pub ledger: Box<dyn TransactionLedger>,
    pub clock: Box<dyn Clock>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        lexicon: Lexicon,
        llm: Arc<dyn LlmProvider>,
        symptoms: Box<dyn SymptomMatcher>,
        ledger: Box<dyn TransactionLedger>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            sessions: SessionStore::new(),
            lexicon,
            llm: CompletionService::new(llm, config.llm_timeout),
            breeds: BreedValidator::new(),
            symptoms,
            ledger,
            clock,
            rate_limiter: RateLimiter::new(config.rate_limit),
            config,
        }
    }

    pub fn clinic_hours(&self) -> ClinicHours {
        ClinicHours {
            open: self.config.clinic_open_hour,
            close: self.config.clinic_close_hour,
        }
    }

    /// Short advisory reply for a described symptom, anchored to `animal`.
    /// A slow matcher is treated as having found nothing.
    pub async fn symptom_advice(&self, raw: &str, animal: Option<&str>) -> String {
        let found = match tokio::time::timeout(
            self.config.llm_timeout,
            self.symptoms.match_symptom(raw, animal),
        )
        .await
        {
            Ok(found) => found,
            Err(_) => {
                tracing::warn!("symptom matcher timed out");
                SymptomMatch::none()
            }
        };
        tracing::debug!(score = found.score, matched = found.matched.is_some(), "symptom match");

        let prompt = symptom_prompt(raw, &found, self.config.similarity_threshold, animal);
        self.llm.complete_text(&prompt, true).await
    }
}
