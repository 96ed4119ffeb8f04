pub mod completion;
pub mod extraction;
pub mod openai_compat;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use completion::CompletionService;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// An empty `system_prompt` means no system message is sent.
    async fn chat(&self, system_prompt: &str, messages: &[Message]) -> anyhow::Result<String>;
}
