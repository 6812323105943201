//! Advice categories and the business context sent with every request.

use serde::{Deserialize, Serialize};

use crate::wizard::{FieldKey, ResponseStore};

/// What kind of advice is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceCategory {
    ValueEnhancement,
    DreamOutcome,
    RiskReversal,
    Bonuses,
    OfferAnalysis,
}

impl AdviceCategory {
    pub const ALL: [AdviceCategory; 5] = [
        Self::ValueEnhancement,
        Self::DreamOutcome,
        Self::RiskReversal,
        Self::Bonuses,
        Self::OfferAnalysis,
    ];
}

impl std::fmt::Display for AdviceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ValueEnhancement => "value_enhancement",
            Self::DreamOutcome => "dream_outcome",
            Self::RiskReversal => "risk_reversal",
            Self::Bonuses => "bonuses",
            Self::OfferAnalysis => "offer_analysis",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for AdviceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.to_string() == s)
            .ok_or_else(|| format!("unknown advice category '{s}'"))
    }
}

/// Business basics the advisor uses to tailor its answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusinessContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

impl BusinessContext {
    pub fn from_responses(responses: &ResponseStore) -> Self {
        let field = |key| responses.non_empty_text(key).map(String::from);
        Self {
            industry: field(FieldKey::Industry),
            product: field(FieldKey::Product),
            price: field(FieldKey::Price),
            goal: field(FieldKey::Goal),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.industry.is_none() && self.product.is_none() && self.price.is_none() && self.goal.is_none()
    }

    /// Markdown block for prompt injection.
    pub fn to_prompt_section(&self) -> String {
        let mut parts = vec!["# Business Context".to_string()];
        let entries = [
            ("Industry", &self.industry),
            ("Product/Service", &self.product),
            ("Price point", &self.price),
            ("Offer goal", &self.goal),
        ];
        for (label, value) in entries {
            if let Some(value) = value {
                parts.push(format!("- **{label}:** {value}"));
            }
        }
        if parts.len() == 1 {
            parts.push("- (no business details provided yet)".to_string());
        }
        parts.join("\n")
    }
}
