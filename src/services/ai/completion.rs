use std::sync::Arc;
use std::time::Duration;

use super::{LlmProvider, Message};
use crate::models::Species;

/// Returned by [`CompletionService::complete_text`] when the provider is unreachable.
pub const TEXT_FALLBACK: &str = "I'm currently unable to reach the AI service. \
Please book a consultation through VetConnect so a vet can assess your pet directly. \
Only a licensed veterinarian can confirm the exact cause.";

/// Returned by [`CompletionService::complete_direct`] when the provider is unreachable.
pub const DIRECT_FALLBACK: &str = "None";

/// Wraps an [`LlmProvider`] so that callers never see an error: every call is
/// bounded by `timeout`, and failures collapse into a fixed fallback string.
pub struct CompletionService {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
    persona: String,
}

impl CompletionService {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            persona: persona_prompt(),
        }
    }

    /// Free-text answer, optionally under the clinic assistant persona.
    pub async fn complete_text(&self, prompt: &str, use_persona: bool) -> String {
        let system = if use_persona { self.persona.as_str() } else { "" };
        self.call(system, prompt)
            .await
            .unwrap_or_else(|| TEXT_FALLBACK.to_string())
    }

    /// Bare prompt with no persona, for extraction and yes/no checks.
    pub async fn complete_direct(&self, prompt: &str) -> String {
        self.call("", prompt)
            .await
            .unwrap_or_else(|| DIRECT_FALLBACK.to_string())
    }

    async fn call(&self, system: &str, prompt: &str) -> Option<String> {
        let messages = [Message::user(prompt)];
        match tokio::time::timeout(self.timeout, self.provider.chat(system, &messages)).await {
            Ok(Ok(text)) => Some(text),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "completion call failed, using fallback");
                None
            }
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "completion call timed out, using fallback");
                None
            }
        }
    }
}

fn persona_prompt() -> String {
    let animals = Species::ALL
        .iter()
        .map(Species::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are "VetBot", the assistant for VetConnect Veterinary Clinic.

Rules you must always follow:
1. Only advise on these animals: {animals}. For any other animal say: "We only treat domestic and farm animals at VetConnect."
2. Base the whole answer on the animal the user has, and never mention a different species.
3. If symptoms include bleeding, seizures, unconsciousness, poisoning or breathing difficulty, reply only: "EMERGENCY ALERT: Critical symptoms detected. Book an emergency appointment immediately through VetConnect."
4. Never state a diagnosis as fact. Use wording like "Possible causes include" or "This could be related to".
5. End every medical answer with: "Only a licensed veterinarian can confirm the exact cause."
6. Two or three sentences at most, with no lists, headers or bold text.
7. Stay professional, calm and empathetic.
8. Never tell the user to phone the clinic. Close health answers by inviting them to book right here in this chat.
9. If the question is not about pet health, veterinary services or booking, reply: "I can only assist with veterinary questions."
10. If unsure about a condition, say so and recommend a consultation. Never invent drug names, doses or tests.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FailingLlm;

    #[async_trait]
    impl LlmProvider for FailingLlm {
        async fn chat(&self, _system: &str, _messages: &[Message]) -> anyhow::Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    struct SlowLlm;

    #[async_trait]
    impl LlmProvider for SlowLlm {
        async fn chat(&self, _system: &str, _messages: &[Message]) -> anyhow::Result<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    struct EchoSystemLlm;

    #[async_trait]
    impl LlmProvider for EchoSystemLlm {
        async fn chat(&self, system: &str, _messages: &[Message]) -> anyhow::Result<String> {
            Ok(if system.is_empty() { "bare".to_string() } else { "persona".to_string() })
        }
    }

    #[tokio::test]
    async fn test_failure_yields_fallbacks() {
        let svc = CompletionService::new(Arc::new(FailingLlm), Duration::from_secs(1));
        assert_eq!(svc.complete_text("hi", true).await, TEXT_FALLBACK);
        assert_eq!(svc.complete_direct("hi").await, DIRECT_FALLBACK);
    }

    #[tokio::test]
    async fn test_timeout_yields_fallback() {
        let svc = CompletionService::new(Arc::new(SlowLlm), Duration::from_millis(20));
        assert_eq!(svc.complete_direct("hi").await, "None");
    }

    #[tokio::test]
    async fn test_persona_only_when_requested() {
        let svc = CompletionService::new(Arc::new(EchoSystemLlm), Duration::from_secs(1));
        assert_eq!(svc.complete_text("hi", true).await, "persona");
        assert_eq!(svc.complete_text("hi", false).await, "bare");
        assert_eq!(svc.complete_direct("hi").await, "bare");
    }
}
