//! SEA-LION chat-completion client.
//!
//! Sends chat completion requests to the SEA-LION API, walking the fallback
//! table when the preferred model is unavailable. The client is constructed
//! once and shared by reference (typically behind an `Arc`).

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client as HttpClient, StatusCode};

use super::config::ClientConfig;
use super::errors::ClientError;
use super::health::HealthCache;
use super::response::{extract_reply, BodyKind};
use super::types::{ChatRequest, ModelInfo, ModelsResponse};

// ─── SeaLionClient ───────────────────────────────────────────────────────────

/// Client for the SEA-LION chat-completion API.
pub struct SeaLionClient {
    http: HttpClient,
    config: ClientConfig,
    /// Last health probe result, if any.
    pub(crate) health_cache: HealthCache,
}

impl SeaLionClient {
    /// Create a client from a configuration.
    ///
    /// A missing API key is not an error here; it is logged and every later
    /// call fails with [`ClientError::MissingApiKey`].
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder =
            HttpClient::builder().connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder.build().map_err(|e| ClientError::ConnectionFailed {
            endpoint: config.base_url.clone(),
            reason: format!("failed to build HTTP client: {e}"),
        })?;

        if !config.has_api_key() {
            tracing::warn!(
                base_url = %config.base_url,
                "SEA-LION API key not configured; all calls will fail"
            );
        }

        Ok(Self {
            http,
            config,
            health_cache: HealthCache::default(),
        })
    }

    /// Create a client from the environment.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub(crate) fn api_key(&self) -> Result<&str, ClientError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(ClientError::MissingApiKey)
    }

    // ─── Fallback Sequencer ──────────────────────────────────────────────

    /// Send a chat completion, trying `request.model` and then its backups.
    ///
    /// Candidates are tried strictly in order. Rate limits and client errors
    /// abort immediately; server errors, transport failures and blank replies
    /// move on to the next candidate.
    pub async fn chat_completion(&self, request: &ChatRequest) -> Result<String, ClientError> {
        let api_key = self.api_key()?;
        request.validate()?;

        let candidates = self.config.fallbacks.candidates(&request.model);
        let mut last_error: Option<ClientError> = None;

        for (attempt, model) in candidates.iter().enumerate() {
            match self.send_chat(request, model, api_key).await {
                Ok(text) => {
                    if attempt > 0 {
                        tracing::info!(
                            requested = %request.model,
                            model = %model,
                            attempt,
                            "chat completion served by backup model"
                        );
                    }
                    return Ok(text);
                }
                Err(e) if e.is_retryable() => {
                    tracing::warn!(
                        model = %model,
                        attempt,
                        remaining = candidates.len() - attempt - 1,
                        error = %e,
                        "chat completion failed, trying next candidate"
                    );
                    // Blank replies are skipped without being recorded.
                    if !matches!(e, ClientError::EmptyResponse { .. }) {
                        last_error = Some(e);
                    }
                }
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "chat completion aborted");
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or(ClientError::AllModelsUnavailable {
            attempted: candidates,
        }))
    }

    /// Send `request` to exactly `model`, without consulting the fallback table.
    pub(crate) async fn chat_completion_with(
        &self,
        request: &ChatRequest,
        model: &str,
    ) -> Result<String, ClientError> {
        let api_key = self.api_key()?;
        request.validate()?;
        self.send_chat(request, model, api_key).await
    }

    // ─── Transport ───────────────────────────────────────────────────────

    /// One request/response cycle against a single model.
    async fn send_chat(
        &self,
        request: &ChatRequest,
        model: &str,
        api_key: &str,
    ) -> Result<String, ClientError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = request.to_wire(model);

        tracing::debug!(
            url = %url,
            model = %model,
            message_count = body.messages.len(),
            thinking_mode = ?request.thinking_mode,
            "sending chat completion"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .header(ACCEPT, "text/plain")
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::from_transport(&url, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(status_error(model, status, body_text));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::from_transport(&url, &e))?;

        extract_reply(model, BodyKind::from_content_type(content_type.as_deref()), &text)
    }

    // ─── Models ──────────────────────────────────────────────────────────

    /// List the models exposed by the API.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, ClientError> {
        let api_key = self.api_key()?;
        let url = format!("{}/models", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| ClientError::from_transport(&url, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(status_error("models", status, body_text));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::from_transport(&url, &e))?;

        let parsed: ModelsResponse =
            serde_json::from_str(&text).map_err(|e| ClientError::MalformedResponse {
                model: "models".to_string(),
                reason: e.to_string(),
            })?;

        Ok(parsed.data)
    }
}

/// Classify a non-2xx status.
fn status_error(model: &str, status: StatusCode, body: String) -> ClientError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        ClientError::RateLimited {
            model: model.to_string(),
            body,
        }
    } else if status.as_u16() >= 500 {
        ClientError::ServerError {
            model: model.to_string(),
            status: status.as_u16(),
            body,
        }
    } else {
        ClientError::ApiError {
            model: model.to_string(),
            status: status.as_u16(),
            body,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
