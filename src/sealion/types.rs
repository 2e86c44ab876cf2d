//! Shared types for the SEA-LION client.
//!
//! Request types mirror the OpenAI Chat Completions API plus the two
//! SEA-LION extensions the client uses: `cache.no_cache` and
//! `chat_template_kwargs.thinking_mode`.

use serde::{Deserialize, Serialize};

use super::errors::ClientError;

// ─── Caller-facing Types ─────────────────────────────────────────────────────

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Optional sampling parameter overrides for a single call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SamplingOverrides {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// A chat completion request as issued by callers.
///
/// `model` names the preferred model; the sequencer may substitute a backup.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// `Some(true)` turns on the reasoning models' thinking mode.
    pub thinking_mode: Option<bool>,
    pub stream: Option<bool>,
    pub sampling: SamplingOverrides,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            thinking_mode: None,
            stream: None,
            sampling: SamplingOverrides::default(),
        }
    }

    pub fn with_thinking_mode(mut self, enabled: bool) -> Self {
        self.thinking_mode = Some(enabled);
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingOverrides) -> Self {
        self.sampling = sampling;
        self
    }

    /// Reject requests that would be meaningless on the wire.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.messages.is_empty() {
            return Err(ClientError::InvalidRequest {
                reason: "messages must not be empty".into(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(ClientError::InvalidRequest {
                reason: "model must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Build the wire body for one candidate model.
    ///
    /// The cache bypass is always on; callers cannot turn it off.
    pub(crate) fn to_wire(&self, model: &str) -> ChatCompletionRequest<'_> {
        ChatCompletionRequest {
            model: model.to_string(),
            messages: &self.messages,
            cache: CacheOptions { no_cache: true },
            chat_template_kwargs: self.thinking_mode.map(|on| ChatTemplateKwargs {
                thinking_mode: if on { "on" } else { "off" },
            }),
            stream: self.stream,
            temperature: self.sampling.temperature,
            max_tokens: self.sampling.max_tokens,
        }
    }
}

// ─── Wire Types ──────────────────────────────────────────────────────────────

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: String,
    pub messages: &'a [ChatMessage],
    pub cache: CacheOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_template_kwargs: Option<ChatTemplateKwargs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Cache-bypass flag understood by the SEA-LION gateway.
#[derive(Debug, Serialize)]
pub(crate) struct CacheOptions {
    pub no_cache: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatTemplateKwargs {
    pub thinking_mode: &'static str,
}

/// Non-streaming chat completion response (JSON flavour).
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    pub content: Option<String>,
}

/// One entry of the `GET /models` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
}

/// `GET /models` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::assistant("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_validate_rejects_empty_messages() {
        let req = ChatRequest::new("m", vec![]);
        assert!(matches!(
            req.validate(),
            Err(ClientError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_wire_body_forces_no_cache_and_overrides_model() {
        let req = ChatRequest::new("requested", vec![ChatMessage::user("hello")]);
        let body = serde_json::to_value(req.to_wire("candidate")).unwrap();

        assert_eq!(body["model"], "candidate");
        assert_eq!(body["cache"]["no_cache"], true);
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("chat_template_kwargs").is_none());
        assert!(body.get("stream").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_wire_body_thinking_mode() {
        let req = ChatRequest::new("r", vec![ChatMessage::user("why?")]).with_thinking_mode(true);
        let body = serde_json::to_value(req.to_wire("r")).unwrap();
        assert_eq!(body["chat_template_kwargs"]["thinking_mode"], "on");

        let req = ChatRequest::new("r", vec![ChatMessage::user("why?")]).with_thinking_mode(false);
        let body = serde_json::to_value(req.to_wire("r")).unwrap();
        assert_eq!(body["chat_template_kwargs"]["thinking_mode"], "off");
    }

    #[test]
    fn test_models_response_tolerates_extra_fields() {
        let raw = r#"{"object":"list","data":[{"id":"a","object":"model"},{"id":"b","owned_by":"aisg"}]}"#;
        let parsed: ModelsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[1].owned_by.as_deref(), Some("aisg"));
    }
}
