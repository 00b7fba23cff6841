use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transcript::{ChatTurn, TranscriptStore};

/// Body posted by the chat page for each new message
///
/// `model` and `provider` are optional; the server picks the best available
/// pair when they are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Current text from the composer
    pub message: String,
    /// Turns already exchanged in this page session
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self { model: None, provider: None, message: message.into(), history: Vec::new() }
    }

    /// Pick a model; blank values count as "unspecified" like an empty `<select>`.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = non_blank(model.into());
        self
    }

    /// Pick a provider; blank values count as "unspecified".
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = non_blank(provider.into());
        self
    }

    /// Attach the transcript as it stands now
    pub fn with_history(mut self, store: &TranscriptStore) -> Self {
        self.history = store.snapshot();
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
