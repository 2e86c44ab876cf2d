//! PawCover assistant backend: a SEA-LION chat-completion client with model
//! fallback, cached health probing, and pet-insurance convenience prompts.
//!
//! Construct one [`SeaLionClient`] at startup and share it:
//!
//! ```no_run
//! use std::sync::Arc;
//! use sealion_client::{ClientConfig, PetAssistant, SeaLionClient};
//!
//! # async fn demo() -> Result<(), sealion_client::ClientError> {
//! let client = Arc::new(SeaLionClient::new(ClientConfig::load()?)?);
//! let assistant = PetAssistant::new(Arc::clone(&client));
//!
//! let reply = assistant.chat("Does my policy cover dental cleaning?").await?;
//! let health = client.check_health(false).await;
//! println!("{reply} ({:?})", health.status);
//! # Ok(())
//! # }
//! ```

pub mod assistant;
pub mod logging;
pub mod sealion;

pub use assistant::{ClaimAnalysis, ClaimAspect, ClaimSummary, Language, PetAssistant};
pub use logging::{init_tracing, LogFormat, LogTarget};
pub use sealion::{
    ChatMessage, ChatRequest, ClientConfig, ClientError, HealthStatus, ModelHealth, Role,
    SeaLionClient, ServiceHealth,
};
