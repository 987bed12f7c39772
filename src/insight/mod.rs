//! Insight generation — turns a health snapshot plus today's self-ratings
//! into a short coaching message.

pub mod prompt;

pub use prompt::{COACH_SYSTEM_PROMPT, MAX_INSIGHT_CHARS, build_insight_prompt};

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::InsightError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};
use crate::oura::HealthSnapshot;

/// Sampling temperature for insight generation.
pub const INSIGHT_TEMPERATURE: f32 = 0.7;

/// Produces coaching messages through an [`LlmProvider`].
pub struct InsightGenerator {
    llm: Arc<dyn LlmProvider>,
}

impl InsightGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Generate one insight. Failures come back as [`InsightError`] so the
    /// caller decides how to present them.
    pub async fn generate(
        &self,
        snapshot: &HealthSnapshot,
        sleep_rating: u8,
        stress_rating: u8,
    ) -> Result<String, InsightError> {
        let messages = vec![
            ChatMessage::system(COACH_SYSTEM_PROMPT),
            ChatMessage::user(build_insight_prompt(snapshot, sleep_rating, stress_rating)),
        ];
        let request = CompletionRequest::new(messages).with_temperature(INSIGHT_TEMPERATURE);

        let response = self.llm.complete(request).await.map_err(|e| {
            warn!(model = self.llm.model_name(), error = %e, "Insight generation failed");
            InsightError::from(e)
        })?;

        let text = response.content.trim();
        if text.is_empty() {
            return Err(InsightError::Empty);
        }

        let chars = text.chars().count();
        if chars > MAX_INSIGHT_CHARS {
            warn!(chars, "Insight exceeds requested length budget");
        }
        info!(model = self.llm.model_name(), chars, "Insight generated");
        Ok(text.to_string())
    }
}
