use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use vetconnect::config::AppConfig;
use vetconnect::handlers;
use vetconnect::models::Lexicon;
use vetconnect::services::ai::openai_compat::{OpenAiCompatProvider, GROQ_BASE_URL};
use vetconnect::services::ai::LlmProvider;
use vetconnect::services::ledger::HashLedger;
use vetconnect::services::scheduling::SystemClock;
use vetconnect::services::symptoms::LexicalSymptomMatcher;
use vetconnect::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    anyhow::ensure!(
        config.clinic_open_hour < config.clinic_close_hour && config.clinic_close_hour <= 24,
        "CLINIC_OPEN_HOUR must be before CLINIC_CLOSE_HOUR"
    );

    let lexicon = match &config.lexicon_path {
        Some(path) => {
            tracing::info!("loading lexicon from {path}");
            Lexicon::load(path)?
        }
        None => Lexicon::builtin()?,
    };

    let llm: Arc<dyn LlmProvider> = match config.llm_provider.as_str() {
        "ollama" => {
            tracing::info!("using Ollama LLM provider (url: {}, model: {})", config.ollama_url, config.llm_model);
            Arc::new(OpenAiCompatProvider::new(
                format!("{}/v1", config.ollama_url.trim_end_matches('/')),
                String::new(),
                config.llm_model.clone(),
            ))
        }
        "groq" => {
            anyhow::ensure!(!config.llm_api_key.is_empty(), "LLM_API_KEY must be set when LLM_PROVIDER=groq");
            tracing::info!("using Groq LLM provider (model: {})", config.llm_model);
            Arc::new(OpenAiCompatProvider::new(
                GROQ_BASE_URL.to_string(),
                config.llm_api_key.clone(),
                config.llm_model.clone(),
            ))
        }
        _ => {
            anyhow::ensure!(!config.llm_api_key.is_empty(), "LLM_API_KEY must be set when LLM_PROVIDER=openrouter");
            tracing::info!("using OpenRouter LLM provider (url: {}, model: {})", config.llm_base_url, config.llm_model);
            Arc::new(OpenAiCompatProvider::new(
                config.llm_base_url.clone(),
                config.llm_api_key.clone(),
                config.llm_model.clone(),
            ))
        }
    };

    let symptoms = match &config.symptom_kb_path {
        Some(path) => {
            let matcher = LexicalSymptomMatcher::load(path)?;
            tracing::info!("loaded {} symptom knowledge base entries", matcher.len());
            matcher
        }
        None => {
            tracing::warn!("SYMPTOM_KB_PATH not set, symptom matching runs without a knowledge base");
            LexicalSymptomMatcher::new(Vec::new())
        }
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState::new(
        config,
        lexicon,
        llm,
        Box::new(symptoms),
        Box::new(HashLedger),
        Box::new(SystemClock),
    ));

    let app = handlers::router(state);

    tracing::info!("starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
