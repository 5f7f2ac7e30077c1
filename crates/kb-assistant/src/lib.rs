//! kb-assistant: web front-end for a hosted knowledge assistant
//!
//! Questions are sent to the assistant's MCP chat endpoint first; if that
//! fails or comes back empty, the assistant chat API is used instead. Either
//! way the caller gets the same answer envelope with citations.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod providers;
pub mod server;
pub mod types;
pub mod upstream;

pub use bootstrap::Bootstrap;
pub use config::AssistantConfig;
pub use error::{Error, Result};
pub use generation::{normalize, NormalizedAnswer};
pub use pipeline::AnswerPipeline;
pub use types::{AnswerEnvelope, AnswerSource, Citation};
pub use upstream::{CallResult, FailureKind, UpstreamCaller};
