//! Core types for the assistant front-end

pub mod query;
pub mod response;

pub use query::{AskRequest, CallOptions, ChatRequest};
pub use response::{AnswerEnvelope, AnswerSource, Citation, ResponseMetadata};
