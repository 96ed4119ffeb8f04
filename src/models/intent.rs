use serde::{Deserialize, Serialize};

/// What an idle-session message is asking for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Book,
    AskHours,
    AskServices,
    CancelInfo,
    SymptomScreen,
    Wildlife(String),
    Fallback,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Book => "book",
            Intent::AskHours => "ask_hours",
            Intent::AskServices => "ask_services",
            Intent::CancelInfo => "cancel_info",
            Intent::SymptomScreen => "symptom_screen",
            Intent::Wildlife(_) => "wildlife",
            Intent::Fallback => "fallback",
        }
    }
}
