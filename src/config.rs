use std::env;
use std::time::Duration;

use crate::services::ai::openai_compat::OPENROUTER_BASE_URL;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub llm_provider: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_base_url: String,
    pub ollama_url: String,
    pub llm_timeout: Duration,
    pub rate_limit: Duration,
    pub clinic_open_hour: u32,
    pub clinic_close_hour: u32,
    pub similarity_threshold: f32,
    pub lexicon_path: Option<String>,
    pub symptom_kb_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: parse_var("PORT").unwrap_or(8001),
            llm_provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "openrouter".to_string()),
            llm_api_key: env::var("LLM_API_KEY").unwrap_or_default(),
            llm_model: env::var("LLM_MODEL")
                .unwrap_or_else(|_| "mistralai/mistral-7b-instruct".to_string()),
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| OPENROUTER_BASE_URL.to_string()),
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            llm_timeout: Duration::from_secs(parse_var("LLM_TIMEOUT_SECS").unwrap_or(15)),
            rate_limit: Duration::from_secs_f64(rate_limit_secs(parse_var("RATE_LIMIT_SECONDS"))),
            clinic_open_hour: parse_var("CLINIC_OPEN_HOUR").unwrap_or(7),
            clinic_close_hour: parse_var("CLINIC_CLOSE_HOUR").unwrap_or(20),
            similarity_threshold: parse_var("SIMILARITY_THRESHOLD").unwrap_or(0.3),
            lexicon_path: env::var("LEXICON_PATH").ok().filter(|p| !p.is_empty()),
            symptom_kb_path: env::var("SYMPTOM_KB_PATH").ok().filter(|p| !p.is_empty()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8001,
            llm_provider: "openrouter".to_string(),
            llm_api_key: String::new(),
            llm_model: "mistralai/mistral-7b-instruct".to_string(),
            llm_base_url: OPENROUTER_BASE_URL.to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            llm_timeout: Duration::from_secs(15),
            rate_limit: Duration::from_secs(3),
            clinic_open_hour: 7,
            clinic_close_hour: 20,
            similarity_threshold: 0.3,
            lexicon_path: None,
            symptom_kb_path: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Negative or non-finite values fall back to the default cooldown.
fn rate_limit_secs(parsed: Option<f64>) -> f64 {
    parsed.filter(|s: &f64| s.is_finite() && *s >= 0.0).unwrap_or(3.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_rejects_unusable_values() {
        assert_eq!(rate_limit_secs(Some(1.5)), 1.5);
        assert_eq!(rate_limit_secs(Some(0.0)), 0.0);
        assert_eq!(rate_limit_secs(Some(-2.0)), 3.0);
        assert_eq!(rate_limit_secs(Some(f64::NAN)), 3.0);
        assert_eq!(rate_limit_secs(Some(f64::INFINITY)), 3.0);
        assert_eq!(rate_limit_secs(None), 3.0);
    }
}
