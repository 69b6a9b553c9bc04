use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use localrag_core::config::DelegatedConfig;
use localrag_core::error::{Error, Result};
use localrag_core::traits::Synthesizer;
use localrag_core::types::RetrievalHit;

use crate::prompts::{context_blocks, user_message, SYSTEM_INSTRUCTION};

/// Answers by forwarding retrieved context to a chat-completion endpoint.
///
/// One blocking POST per question, bounded by `timeout_secs`. Failures are
/// returned as [`Error::Synthesis`] and never retried.
pub struct DelegatedSynthesizer {
    config: DelegatedConfig,
    api_key: String,
    agent: ureq::Agent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl DelegatedSynthesizer {
    /// Read the bearer key from the env var named in `config.api_key_env`.
    pub fn from_env(config: DelegatedConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(Error::InvalidConfig(format!(
                "{} not set. Use the offline provider or set the key.",
                config.api_key_env
            )));
        }
        Self::new(api_key, config)
    }

    pub fn new(api_key: impl Into<String>, config: DelegatedConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::InvalidConfig("API key must not be empty".into()));
        }
        let agent = ureq::AgentBuilder::new().timeout(Duration::from_secs(config.timeout_secs)).build();
        Ok(Self { config, api_key, agent })
    }

    pub fn build_request(&self, query: &str, hits: &[RetrievalHit]) -> ChatRequest {
        let context = context_blocks(hits, self.config.max_context_blocks);
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage { role: "system".into(), content: SYSTEM_INSTRUCTION.into() },
                ChatMessage { role: "user".into(), content: user_message(query, &context) },
            ],
            temperature: self.config.temperature,
        }
    }

    pub fn answer(&self, query: &str, hits: &[RetrievalHit]) -> Result<String> {
        let request = self.build_request(query, hits);
        debug!(
            model = %self.config.model,
            blocks = hits.len().min(self.config.max_context_blocks),
            "calling chat completion endpoint"
        );
        let resp = self
            .agent
            .post(&self.config.endpoint)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
            .send_json(&request);

        match resp {
            Ok(r) => {
                let body = r
                    .into_string()
                    .map_err(|e| Error::Synthesis(format!("failed to read completion response: {e}")))?;
                parse_completion(&body)
            }
            Err(ureq::Error::Status(code, r)) => {
                let details: String = r.into_string().unwrap_or_default().chars().take(300).collect();
                warn!(status = code, "chat completion request rejected");
                Err(Error::Synthesis(format!("completion endpoint returned status {code}: {details}")))
            }
            Err(e) => {
                warn!(error = %e, "chat completion request failed");
                Err(Error::Synthesis(format!("failed to call completion endpoint: {e}")))
            }
        }
    }
}

/// Trimmed content of the first choice of a chat-completion response body.
pub fn parse_completion(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::Synthesis(format!("failed to decode completion response: {e}")))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| Error::Synthesis("completion response contained no message content".into()))
}

impl std::fmt::Debug for DelegatedSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatedSynthesizer").field("config", &self.config).field("api_key", &"<redacted>").finish()
    }
}

impl Synthesizer for DelegatedSynthesizer {
    fn answer(&self, query: &str, hits: &[RetrievalHit]) -> Result<String> { Self::answer(self, query, hits) }
}
