//! Answer strategies
//!
//! Each strategy is one way of answering a prompt; the pipeline tries them
//! in order.

pub mod assistant;
pub mod mcp;
pub mod strategy;

pub use assistant::{AssistantChatClient, AssistantStrategy};
pub use mcp::McpStrategy;
pub use strategy::AnswerStrategy;
