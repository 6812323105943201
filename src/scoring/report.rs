//! Results-step report: score tier, offer summary, and example offers.

use serde::Serialize;

use crate::wizard::{FieldKey, ResponseStore};

use super::engine::{ScoreResult, score};

/// Coarse interpretation of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreTier {
    pub fn from_score(overall: f64) -> Self {
        if overall >= 80.0 {
            Self::Excellent
        } else if overall >= 60.0 {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent! You have a strong no-brainer offer.",
            Self::Good => "Good offer with room for improvement.",
            Self::NeedsImprovement => {
                "Your offer needs significant improvement to become a no-brainer."
            }
        }
    }
}

/// What the customer is being offered, as entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OfferSummary {
    pub core_offer: String,
    pub bonuses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guarantee: Option<String>,
    /// Present only when both total value and price were entered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingSummary {
    pub total_value: String,
    pub price: String,
    /// Value-to-price ratio, one decimal place.
    pub ratio: String,
}

impl OfferSummary {
    pub fn from_responses(responses: &ResponseStore, price_ratio: f64) -> Self {
        let core_offer = responses
            .text(FieldKey::CoreOffer)
            .unwrap_or_default()
            .to_string();

        let bonuses = [FieldKey::Bonus1, FieldKey::Bonus2, FieldKey::Bonus3]
            .into_iter()
            .filter_map(|key| responses.non_empty_text(key))
            .map(String::from)
            .collect();

        let guarantee = responses
            .non_empty_text(FieldKey::GuaranteeStatement)
            .map(String::from);

        let display = |key| {
            responses
                .get(key)
                .map(|v| v.to_string())
                .filter(|s| !s.trim().is_empty())
        };
        let pricing = match (display(FieldKey::TotalValue), display(FieldKey::OfferPrice)) {
            (Some(total_value), Some(price)) => Some(PricingSummary {
                total_value,
                price,
                ratio: format!("{price_ratio:.1}x"),
            }),
            _ => None,
        };

        Self {
            core_offer,
            bonuses,
            guarantee,
            pricing,
        }
    }

    /// Markdown rendering for terminals and LLM context.
    pub fn to_markdown(&self) -> String {
        let mut parts = vec![format!("**Core Offer:** {}", self.core_offer)];

        if !self.bonuses.is_empty() {
            parts.push("**Bonuses:**".to_string());
            for bonus in &self.bonuses {
                parts.push(format!("- {bonus}"));
            }
        }

        if let Some(ref guarantee) = self.guarantee {
            parts.push(format!("**Guarantee:** {guarantee}"));
        }

        if let Some(ref pricing) = self.pricing {
            parts.push(format!("**Value:** ${}", pricing.total_value));
            parts.push(format!("**Price:** ${}", pricing.price));
            parts.push(format!("**Value-to-Price Ratio:** {}", pricing.ratio));
        }

        parts.join("\n")
    }
}

/// Sample offers for an industry; empty for industries without examples.
pub fn industry_examples(industry: &str) -> &'static [&'static str] {
    match industry {
        "SaaS" => &[
            "7-day free trial with no credit card required, then $49/month with 30-day money-back guarantee",
            "Annual plan at 50% discount ($299 instead of $599) with implementation support included",
            "Basic plan free forever, premium features at $19/month with done-for-you setup",
        ],
        "Coaching" => &[
            "First session free, then $199/month with results guarantee (keep the materials and get refund if not satisfied)",
            "6-week program for $997 with 3 bonus group calls and private community access",
            "Risk-free trial: Pay only if you see results in 30 days",
        ],
        "E-commerce" => &[
            "Buy one get one free plus free shipping on orders over $50",
            "30-day at-home trial with free return shipping and full refund",
            "Subscribe and save 20% plus exclusive access to new product launches",
        ],
        "Services" => &[
            "Free audit report + action plan, then $1500 for full implementation with 2X ROI guarantee",
            "Monthly retainer with first month at 50% off and no long-term contract",
            "Pay-for-performance model with minimum fee and success bonuses",
        ],
        _ => &[],
    }
}

/// Everything the results step shows.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub score: ScoreResult,
    pub tier: ScoreTier,
    pub tier_message: &'static str,
    pub summary: OfferSummary,
    pub industry: String,
    pub examples: Vec<&'static str>,
}

impl ScoreReport {
    pub fn build(responses: &ResponseStore) -> Self {
        let score = score(responses);
        let tier = ScoreTier::from_score(score.overall_score);
        let summary = OfferSummary::from_responses(responses, score.price_ratio);
        let industry = responses
            .non_empty_text(FieldKey::Industry)
            .unwrap_or("SaaS")
            .to_string();
        let examples = industry_examples(&industry).to_vec();

        Self {
            score,
            tier,
            tier_message: tier.message(),
            summary,
            industry,
            examples,
        }
    }

    /// Markdown rendering of the whole results step.
    pub fn to_markdown(&self) -> String {
        let mut parts = vec![
            "### Your Offer Summary".to_string(),
            self.summary.to_markdown(),
            String::new(),
            "### Offer Score".to_string(),
            format!("{:.1}/100", self.score.overall_score),
            self.tier_message.to_string(),
        ];

        if !self.examples.is_empty() {
            parts.push(String::new());
            parts.push("### Examples From Your Industry".to_string());
            parts.extend(self.examples.iter().map(|e| format!("- {e}")));
        }

        if !self.score.recommendations.is_empty() {
            parts.push(String::new());
            parts.push("### Suggested Improvements".to_string());
            parts.extend(
                self.score
                    .recommendations
                    .iter()
                    .map(|r| format!("- **{}:** {}", r.title(), r.detail())),
            );
        }

        parts.join("\n")
    }
}
