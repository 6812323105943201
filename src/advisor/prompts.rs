//! Prompt templates for the offer advisor.

use super::model::{AdviceCategory, BusinessContext};

/// Longest page excerpt forwarded to the model during website prefill.
pub const MAX_PAGE_CHARS: usize = 6000;

const BASE: &str = "\
You are an offer strategist helping a business owner build a no-brainer offer.
You draw on the value equation: perceived value rises with the dream outcome and the \
perceived likelihood of achieving it, and falls with the time delay and the effort required.
Guidelines:
- Be concrete and specific to the business described. No generic filler.
- Use short bullet points. At most 5 suggestions.
- Never invent testimonials, statistics, or credentials for the business.";

const OFFER_ANALYSIS_SCHEMA: &str = r#"Respond with ONLY a JSON object, no explanation or markdown formatting:
{
  "industry": "SaaS" | "Coaching" | "E-commerce" | "Services" | "Other",
  "product": "primary product or service",
  "price_range": "Under $100" | "$100-$500" | "$500-$2,000" | "$2,000-$10,000" | "Over $10,000" | "unknown",
  "offer_elements": ["components of the current offer"],
  "value_propositions": ["main promises made to the customer"],
  "guarantees": ["guarantees or risk reversals offered"],
  "dream_outcome": "the result the customer ultimately wants",
  "offer_score": 1-10,
  "recommendation": "the single most important improvement"
}"#;

/// System prompt for a category.
pub fn advisor_system_prompt(category: AdviceCategory) -> String {
    let instructions = match category {
        AdviceCategory::ValueEnhancement => "\
TASK: Value enhancement
Suggest ways to raise the perceived value of the offer without raising delivery cost much: \
stronger outcomes, faster wins, less customer effort, more proof.",

        AdviceCategory::DreamOutcome => "\
TASK: Dream outcome
Rewrite the customer's dream outcome so it is vivid, specific, and measurable. \
Offer 3 alternative phrasings, each one sentence.",

        AdviceCategory::RiskReversal => "\
TASK: Risk reversal
Suggest guarantees that shift purchase risk from the customer to the seller. \
For each, give the exact guarantee wording and the condition that triggers it.",

        AdviceCategory::Bonuses => "\
TASK: Bonuses
Suggest bonuses that are valuable to the customer but cheap to deliver. \
Each bonus must remove an obstacle the customer will hit on the way to the outcome. \
Give each a name and a stated dollar value.",

        AdviceCategory::OfferAnalysis => "\
TASK: Offer analysis
Analyse the offer described and return a structured assessment.",
    };

    let mut prompt = format!("{BASE}\n\n{instructions}");
    if category == AdviceCategory::OfferAnalysis {
        prompt.push_str("\n\n");
        prompt.push_str(OFFER_ANALYSIS_SCHEMA);
    }
    prompt
}

/// User prompt combining the business context with the user's input.
pub fn advisor_user_prompt(
    context: &BusinessContext,
    input: &str,
    category: AdviceCategory,
) -> String {
    let label = match category {
        AdviceCategory::ValueEnhancement => "Current offer",
        AdviceCategory::DreamOutcome => "Current dream outcome",
        AdviceCategory::RiskReversal => "Current guarantee",
        AdviceCategory::Bonuses => "Core offer",
        AdviceCategory::OfferAnalysis => "Offer to analyse",
    };
    let input = input.trim();
    let input = if input.is_empty() { "(not provided)" } else { input };

    format!("{}\n\n{label}:\n{input}", context.to_prompt_section())
}

/// Prompt asking the model to read a business website and describe its offer.
pub fn website_analysis_prompt(url: &str, page_text: &str) -> String {
    let excerpt: String = page_text.chars().take(MAX_PAGE_CHARS).collect();
    format!(
        "Here is the text content of the website {url}:\n\n\
         {excerpt}\n\n\
         Identify the business behind this website and its current offer."
    )
}
