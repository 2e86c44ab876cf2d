//! Assistant facade — convenience operations over the SEA-LION client.
//!
//! Every operation prepends a fixed system prompt and routes through the
//! client's fallback sequencer. Errors are surfaced unchanged, except for
//! moderation, which fails closed.

pub mod claims;
pub mod prompts;

use std::sync::Arc;

use futures::future::join_all;

use crate::sealion::{ChatMessage, ChatRequest, ClientError, SamplingOverrides, SeaLionClient};

pub use claims::{ClaimAnalysis, ClaimAspect, ClaimSummary};
pub use prompts::Language;

/// Sampling for the one-word moderation verdict.
const MODERATION_SAMPLING: SamplingOverrides = SamplingOverrides {
    temperature: Some(0.0),
    max_tokens: Some(8),
};

/// Pet-insurance assistant built on a shared [`SeaLionClient`].
#[derive(Clone)]
pub struct PetAssistant {
    client: Arc<SeaLionClient>,
}

impl PetAssistant {
    pub fn new(client: Arc<SeaLionClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SeaLionClient {
        &self.client
    }

    // ─── Chat ────────────────────────────────────────────────────────────

    /// Single-turn assistant chat on the instruct model.
    pub async fn chat(&self, message: &str) -> Result<String, ClientError> {
        self.chat_with_history(&[], message).await
    }

    /// Assistant chat continuing a prior conversation.
    ///
    /// System messages in `history` are dropped; the assistant prompt is
    /// always the only system message.
    pub async fn chat_with_history(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, ClientError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(prompts::ASSISTANT_SYSTEM_PROMPT));
        messages.extend(
            history
                .iter()
                .filter(|m| m.role != crate::sealion::Role::System)
                .cloned(),
        );
        messages.push(ChatMessage::user(message));

        let model = self.client.config().models.instruct.clone();
        self.client
            .chat_completion(&ChatRequest::new(model, messages))
            .await
    }

    /// Reasoning-model analysis with the thinking mode toggled by `thinking`.
    pub async fn reason(&self, prompt: &str, thinking: bool) -> Result<String, ClientError> {
        let model = self.client.config().models.reasoning.clone();
        let request = ChatRequest::new(
            model,
            vec![
                ChatMessage::system(prompts::REASONING_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ],
        )
        .with_thinking_mode(thinking);

        self.client.chat_completion(&request).await
    }

    /// Answer `prompt` in the requested language.
    pub async fn generate_multilingual_response(
        &self,
        prompt: &str,
        language: Language,
    ) -> Result<String, ClientError> {
        let model = self.client.config().models.instruct.clone();
        let request = ChatRequest::new(
            model,
            vec![
                ChatMessage::system(prompts::multilingual_system_prompt(language)),
                ChatMessage::user(prompt),
            ],
        );

        self.client.chat_completion(&request).await
    }

    // ─── Moderation ──────────────────────────────────────────────────────

    /// Classify `content` with the guard model.
    ///
    /// Returns `false` whenever the check cannot be completed. A reply
    /// containing "unsafe" counts as unsafe even though it contains "safe".
    pub async fn moderate_content(&self, content: &str) -> bool {
        let model = self.client.config().models.guard.clone();
        let request = ChatRequest::new(
            model.clone(),
            vec![
                ChatMessage::system(prompts::MODERATION_SYSTEM_PROMPT),
                ChatMessage::user(content),
            ],
        )
        .with_sampling(MODERATION_SAMPLING);

        match self.client.chat_completion(&request).await {
            Ok(verdict) => {
                let safe = is_safe_verdict(&verdict);
                tracing::debug!(model = %model, safe, "moderation verdict");
                safe
            }
            Err(e) => {
                tracing::warn!(
                    model = %model,
                    error = %e,
                    "moderation check failed; treating content as unsafe"
                );
                false
            }
        }
    }

    // ─── Claims ──────────────────────────────────────────────────────────

    /// Run every [`ClaimAspect`] prompt concurrently.
    pub async fn analyze_claim(&self, claim: &ClaimSummary) -> ClaimAnalysis {
        let model = self.client.config().models.instruct.clone();

        let tasks = ClaimAspect::ALL.iter().map(|&aspect| {
            let request = ChatRequest::new(
                model.clone(),
                vec![
                    ChatMessage::system(prompts::ASSISTANT_SYSTEM_PROMPT),
                    ChatMessage::user(aspect.prompt(claim)),
                ],
            );
            async move { (aspect, self.client.chat_completion(&request).await) }
        });

        let results = join_all(tasks).await;

        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        if failed > 0 {
            tracing::warn!(
                pet = %claim.pet_name,
                failed,
                total = results.len(),
                "claim analysis partially failed"
            );
        }

        ClaimAnalysis { results }
    }
}

/// Case-insensitive verdict parsing; an explicit "unsafe" wins over "safe".
fn is_safe_verdict(reply: &str) -> bool {
    let lower = reply.to_lowercase();
    !lower.contains("unsafe") && lower.contains("safe")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
