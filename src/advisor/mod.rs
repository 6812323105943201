//! Offer advisor: LLM-backed suggestions, offer analysis, and website prefill.
//!
//! Advice is requested as a command. A session answers from its
//! [`SuggestionCache`] when it can, otherwise hands back an
//! [`AdviceRequest::Pending`] that the caller runs against an [`Advisor`]
//! without holding the session, then records the answer.

pub mod analysis;
pub mod cache;
pub mod llm_advisor;
pub mod model;
pub mod prefill;
pub mod prompts;

pub use analysis::OfferAnalysis;
pub use cache::SuggestionCache;
pub use llm_advisor::{Advisor, AdvisorConfig, LlmAdvisor};
pub use model::{AdviceCategory, BusinessContext};
pub use prefill::WebsitePrefill;

/// Outcome of asking a session for advice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceRequest {
    /// Answered from the session's cache.
    Cached(String),
    /// Needs an advisor call.
    Pending {
        category: AdviceCategory,
        input: String,
        context: BusinessContext,
    },
}

impl AdviceRequest {
    /// Run a pending request against `advisor`. Returns the text and whether
    /// it came from the cache.
    pub async fn resolve(self, advisor: &dyn Advisor) -> (String, bool) {
        match self {
            Self::Cached(text) => (text, true),
            Self::Pending {
                category,
                input,
                context,
            } => (advisor.suggest(&context, &input, category).await, false),
        }
    }
}
