//! Question endpoint: MCP first, assistant chat API as fallback

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AnswerEnvelope, AskRequest};

/// POST /ask - Answer a question with citations
pub async fn ask(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AnswerEnvelope>> {
    let request_id = Uuid::new_v4();

    async move {
        let Json(request) =
            payload.map_err(|e| Error::bad_request(format!("Invalid request body: {}", e.body_text())))?;
        let prompt = request.validated_prompt()?;

        let prefix: String = prompt.chars().take(50).collect();
        tracing::info!("Question: \"{}\"", prefix);

        let start = Instant::now();
        let envelope = state.pipeline().answer(prompt, None).await?;

        tracing::info!(
            "Answered in {}ms via {} ({} citations)",
            start.elapsed().as_millis(),
            envelope.source.as_str(),
            envelope.citations.len()
        );

        Ok::<_, Error>(Json(envelope))
    }
    .instrument(tracing::info_span!("ask", %request_id))
    .await
}
