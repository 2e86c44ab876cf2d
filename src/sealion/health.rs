//! Service health probing with a cached result.
//!
//! A probe runs two checks in order: the models listing, then one trivial
//! chat completion against the instruct model. The assembled
//! [`ServiceHealth`] replaces the cached value wholesale and is served from
//! cache until it is older than the configured TTL.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::client::SeaLionClient;
use super::types::{ChatMessage, ChatRequest};

/// Cache slot for the last probe. The async mutex also serializes probes.
pub(crate) type HealthCache = tokio::sync::Mutex<Option<ServiceHealth>>;

// ─── Public Types ────────────────────────────────────────────────────────────

/// Overall service availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Down,
}

/// Per-model probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelHealth {
    Working,
    Failing,
    Unknown,
}

/// Point-in-time assessment of the SEA-LION service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    pub status: HealthStatus,
    pub last_checked: DateTime<Utc>,
    /// Slowest of the two probe latencies, in milliseconds.
    pub response_time: u64,
    pub available_models: BTreeSet<String>,
    pub errors: Vec<String>,
    pub models_health: BTreeMap<String, ModelHealth>,
}

impl ServiceHealth {
    /// Starting state of every probe.
    fn down(models: impl IntoIterator<Item = String>) -> Self {
        Self {
            status: HealthStatus::Down,
            last_checked: Utc::now(),
            response_time: 0,
            available_models: BTreeSet::new(),
            errors: Vec::new(),
            models_health: models
                .into_iter()
                .map(|m| (m, ModelHealth::Unknown))
                .collect(),
        }
    }

    /// Whether this result is younger than `ttl` at `now`.
    ///
    /// A `last_checked` in the future (the clock stepped back) is stale.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        match (now - self.last_checked).to_std() {
            Ok(age) => age < ttl,
            Err(_) => false,
        }
    }
}

// ─── Prober ──────────────────────────────────────────────────────────────────

impl SeaLionClient {
    /// Return the service health, probing only when the cache is stale.
    ///
    /// Never fails: every problem is recorded in [`ServiceHealth::errors`].
    pub async fn check_health(&self, force_refresh: bool) -> ServiceHealth {
        let mut cached = self.health_cache.lock().await;

        if !force_refresh {
            if let Some(health) = cached.as_ref() {
                if health.is_fresh(self.config().health_ttl(), Utc::now()) {
                    tracing::debug!(status = ?health.status, "serving cached health");
                    return health.clone();
                }
            }
        }

        let fresh = self.probe().await;
        tracing::info!(
            status = ?fresh.status,
            response_time_ms = fresh.response_time,
            error_count = fresh.errors.len(),
            "SEA-LION health probe complete"
        );
        *cached = Some(fresh.clone());
        fresh
    }

    /// The cached health result without probing.
    pub async fn cached_health(&self) -> Option<ServiceHealth> {
        self.health_cache.lock().await.clone()
    }

    /// Run both checks and assemble a fresh result.
    async fn probe(&self) -> ServiceHealth {
        let mut health = ServiceHealth::down(self.tracked_models());

        if self.api_key().is_err() {
            health
                .errors
                .push("API key not configured; no requests were made".to_string());
            health.last_checked = Utc::now();
            return health;
        }

        // Models listing
        let started = Instant::now();
        match self.list_models().await {
            Ok(models) if !models.is_empty() => {
                health.status = HealthStatus::Degraded;
                health.available_models = models.into_iter().map(|m| m.id).collect();
                health.response_time = elapsed_ms(started);
            }
            Ok(_) => {
                health
                    .errors
                    .push("Models endpoint returned no models".to_string());
            }
            Err(e) => {
                health.errors.push(format!("Models check failed: {e}"));
            }
        }

        // Trivial chat against the instruct model only; backups are not tried.
        let model = self.config().models.instruct.clone();
        let request = ChatRequest::new(model.clone(), vec![ChatMessage::user("test")]);
        let started = Instant::now();
        match self.chat_completion_with(&request, &model).await {
            Ok(_) => {
                health.models_health.insert(model, ModelHealth::Working);
                // Set unconditionally, even when the models check failed.
                health.status = HealthStatus::Healthy;
                health.response_time = health.response_time.max(elapsed_ms(started));
            }
            Err(e) => {
                health.models_health.insert(model.clone(), ModelHealth::Failing);
                health.errors.push(format!("Chat check failed for {model}: {e}"));
            }
        }

        health.last_checked = Utc::now();
        health
    }

    /// Every model the client may talk to, seeded as `Unknown` in probes.
    fn tracked_models(&self) -> BTreeSet<String> {
        let roles = &self.config().models;
        let mut models: BTreeSet<String> = self.config().fallbacks.known_models().into_iter().collect();
        models.insert(roles.instruct.clone());
        models.insert(roles.reasoning.clone());
        models.insert(roles.guard.clone());
        models
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
