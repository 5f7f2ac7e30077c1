//! Ordered answer pipeline
//!
//! Strategies are attempted once each, in order. The first one to return an
//! envelope with content wins; if none does, the caller gets every
//! strategy's failure in one error.

use std::sync::Arc;

use crate::error::{Error, Result, StrategyFailure};
use crate::providers::AnswerStrategy;
use crate::types::{AnswerEnvelope, CallOptions};

/// Ordered list of answer strategies
#[derive(Clone, Default)]
pub struct AnswerPipeline {
    strategies: Vec<Arc<dyn AnswerStrategy>>,
}

impl AnswerPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy; it runs after every strategy already present
    pub fn with_strategy(mut self, strategy: Arc<dyn AnswerStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Strategy names, in order
    pub fn strategy_names(&self) -> Vec<String> {
        self.strategies.iter().map(|s| s.name().to_string()).collect()
    }

    /// Answer a prompt with the first strategy that succeeds
    pub async fn answer(
        &self,
        prompt: &str,
        options: Option<&CallOptions>,
    ) -> Result<AnswerEnvelope> {
        let mut failures = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            if !strategy.is_available() {
                tracing::warn!("Skipping {}: not available", strategy.name());
                failures.push(StrategyFailure {
                    strategy: strategy.name().to_string(),
                    cause: "not available".to_string(),
                });
                continue;
            }

            match strategy.answer(prompt, options).await {
                Ok(envelope) if envelope.has_content() => {
                    tracing::info!("Answered by {}", strategy.name());
                    return Ok(envelope);
                }
                Ok(_) => failures.push(StrategyFailure {
                    strategy: strategy.name().to_string(),
                    cause: "empty answer".to_string(),
                }),
                Err(e) => {
                    tracing::error!("{} failed: {}", strategy.name(), e);
                    failures.push(StrategyFailure {
                        strategy: strategy.name().to_string(),
                        cause: e.to_string(),
                    });
                }
            }
        }

        Err(Error::AllStrategiesFailed(failures))
    }
}
