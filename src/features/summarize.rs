use std::sync::Arc;

use tracing::{error, info};

use crate::ai::client::{CompletionRequest, LanguageModel};
use crate::ai::prompt_builder::build_summary_prompt;
use crate::core::models::Transcript;
use crate::errors::TldrError;

/// Canned reply for an empty transcript; the model is not called.
pub const NO_MESSAGES_SUMMARY: &str = "No messages found in the specified time frame.";

pub struct Summarizer {
    model: Arc<dyn LanguageModel>,
}

impl Summarizer {
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Produce a short digest of `transcript` with one model call.
    ///
    /// # Errors
    ///
    /// Any model failure surfaces as `SummarizationFailed`; there is no retry.
    pub async fn summarize(&self, transcript: &Transcript) -> Result<String, TldrError> {
        if transcript.is_empty() {
            return Ok(NO_MESSAGES_SUMMARY.to_string());
        }

        info!("Summarizing transcript of {} records", transcript.len());

        let prompt = build_summary_prompt(transcript);
        let summary = self
            .model
            .complete(CompletionRequest::text(prompt))
            .await
            .map_err(|e| {
                error!("Summarization call failed: {}", e);
                TldrError::SummarizationFailed(e.to_string())
            })?;

        let summary = summary.trim();
        if summary.is_empty() {
            return Err(TldrError::SummarizationFailed(
                "model returned an empty summary".to_string(),
            ));
        }
        Ok(summary.to_string())
    }
}
