//! Primary call path: the assistant's MCP chat endpoint

pub mod client;
pub mod result;

pub use client::UpstreamCaller;
pub use result::{CallFailure, CallResult, FailureKind, UpstreamReply};
