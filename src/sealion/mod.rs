//! SEA-LION API client — OpenAI-compatible chat completions with model fallback.
//!
//! This module handles all communication with the SEA-LION endpoint:
//! - Chat completions with a per-model fallback table
//! - Content-type aware response normalization
//! - Models listing and cached health probing
//! - Configuration from the environment or `sealion.yaml`

pub mod client;
pub mod config;
pub mod errors;
pub mod fallback;
pub mod health;
pub mod response;
pub mod types;

pub use client::SeaLionClient;
pub use config::{ClientConfig, ModelRoles};
pub use errors::ClientError;
pub use fallback::FallbackTable;
pub use health::{HealthStatus, ModelHealth, ServiceHealth};
pub use types::{ChatMessage, ChatRequest, ModelInfo, Role, SamplingOverrides};
