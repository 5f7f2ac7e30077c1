//! Answer strategy trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AnswerEnvelope, CallOptions};

/// One way of turning a prompt into an answer
///
/// Implementations:
/// - `McpStrategy`: direct call to the assistant's MCP chat endpoint
/// - `AssistantStrategy`: the assistant chat API (fallback path)
#[async_trait]
pub trait AnswerStrategy: Send + Sync {
    /// Answer a prompt; an envelope without content must be reported as an error
    async fn answer(&self, prompt: &str, options: Option<&CallOptions>) -> Result<AnswerEnvelope>;

    /// Whether this strategy can be attempted in this process
    fn is_available(&self) -> bool {
        true
    }

    /// Strategy name for logging and error reports
    fn name(&self) -> &str;
}
