//! The `Advisor` seam and its LLM-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

use super::analysis::OfferAnalysis;
use super::model::{AdviceCategory, BusinessContext};
use super::prompts::{advisor_system_prompt, advisor_user_prompt};

/// Source of freeform advice about an offer.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Ask for advice, surfacing failures.
    async fn try_suggest(
        &self,
        context: &BusinessContext,
        input: &str,
        category: AdviceCategory,
    ) -> Result<String, LlmError>;

    /// Ask for advice. Failures come back as inline text starting with
    /// "Error:" so callers can always display the result.
    async fn suggest(
        &self,
        context: &BusinessContext,
        input: &str,
        category: AdviceCategory,
    ) -> String {
        match self.try_suggest(context, input, category).await {
            Ok(text) => text,
            Err(e) => {
                warn!(category = %category, error = %e, "Advisor call failed");
                format!("Error: could not generate suggestions: {e}")
            }
        }
    }

    /// Structured assessment of an offer described in `input`.
    async fn analyze_offer(&self, context: &BusinessContext, input: &str) -> OfferAnalysis {
        match self
            .try_suggest(context, input, AdviceCategory::OfferAnalysis)
            .await
        {
            Ok(text) => OfferAnalysis::parse(&text),
            Err(e) => {
                warn!(error = %e, "Offer analysis call failed");
                OfferAnalysis::fallback(format!("Error: analysis failed: {e}"))
            }
        }
    }
}

/// Settings for advice generation.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

/// Advisor backed by an `LlmProvider`.
pub struct LlmAdvisor {
    llm: Arc<dyn LlmProvider>,
    config: AdvisorConfig,
}

impl LlmAdvisor {
    pub fn new(llm: Arc<dyn LlmProvider>, config: AdvisorConfig) -> Self {
        Self { llm, config }
    }
}

#[async_trait]
impl Advisor for LlmAdvisor {
    async fn try_suggest(
        &self,
        context: &BusinessContext,
        input: &str,
        category: AdviceCategory,
    ) -> Result<String, LlmError> {
        info!(
            category = %category,
            model = %self.llm.model_name(),
            "Requesting advice"
        );

        // Structured output wants a cold model.
        let temperature = if category == AdviceCategory::OfferAnalysis {
            0.0
        } else {
            self.config.temperature
        };

        let request = CompletionRequest::new(vec![
            ChatMessage::system(advisor_system_prompt(category)),
            ChatMessage::user(advisor_user_prompt(context, input, category)),
        ])
        .with_temperature(temperature)
        .with_max_tokens(self.config.max_tokens);

        let response = self.llm.complete(request).await?;
        let content = response.content.trim().to_string();
        if content.is_empty() {
            return Err(LlmError::InvalidResponse {
                provider: self.llm.model_name().to_string(),
                reason: "empty completion".to_string(),
            });
        }

        debug!(category = %category, len = content.len(), "Advice received");
        Ok(content)
    }
}
