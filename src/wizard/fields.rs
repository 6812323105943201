//! Field vocabulary: every question the wizard asks, its input kind, and the
//! values it accepts.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

use super::state::WizardStep;

pub const INDUSTRY_OPTIONS: &[&str] = &["SaaS", "Coaching", "E-commerce", "Services", "Other"];

pub const PRICE_OPTIONS: &[&str] = &[
    "Under $100",
    "$100-$500",
    "$500-$2,000",
    "$2,000-$10,000",
    "Over $10,000",
];

pub const GOAL_OPTIONS: &[&str] = &[
    "Customer Acquisition",
    "Upselling Existing Customers",
    "Reactivating Past Customers",
    "Introducing New Product",
];

pub const PROOF_OPTIONS: &[&str] = &[
    "Case Studies/Testimonials",
    "Data/Statistics",
    "Before/After Examples",
    "Process Demonstration",
    "Third-Party Validation",
    "Personal Story",
];

pub const TIME_OPTIONS: &[&str] = &["Immediate", "Days", "Weeks", "Months", "Years"];

pub const GUARANTEE_OPTIONS: &[&str] = &[
    "Money-back guarantee",
    "Performance guarantee",
    "Try before you buy",
    "Pay only if satisfied",
    "Keep resources even if refunded",
    "Extended guarantee period",
];

/// Slider fields share one scale.
pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 10;
pub const RATING_DEFAULT: i64 = 5;

pub const MONEY_MIN: i64 = 0;
pub const MONEY_MAX: i64 = 1_000_000;
pub const TOTAL_VALUE_DEFAULT: i64 = 1000;
pub const OFFER_PRICE_DEFAULT: i64 = 500;

/// A key in the response store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Industry,
    Product,
    Price,
    Goal,
    OutcomeDescription,
    OutcomeValue,
    ProofElements,
    SuccessStory,
    Credibility,
    TimeToResults,
    Acceleration,
    Speed,
    EffortRequired,
    EffortReduction,
    Ease,
    Guarantees,
    GuaranteeStatement,
    RiskReversal,
    CoreOffer,
    #[serde(rename = "bonus_1")]
    Bonus1,
    #[serde(rename = "bonus_2")]
    Bonus2,
    #[serde(rename = "bonus_3")]
    Bonus3,
    TotalValue,
    OfferPrice,
}

impl FieldKey {
    pub const ALL: [FieldKey; 24] = [
        Self::Industry,
        Self::Product,
        Self::Price,
        Self::Goal,
        Self::OutcomeDescription,
        Self::OutcomeValue,
        Self::ProofElements,
        Self::SuccessStory,
        Self::Credibility,
        Self::TimeToResults,
        Self::Acceleration,
        Self::Speed,
        Self::EffortRequired,
        Self::EffortReduction,
        Self::Ease,
        Self::Guarantees,
        Self::GuaranteeStatement,
        Self::RiskReversal,
        Self::CoreOffer,
        Self::Bonus1,
        Self::Bonus2,
        Self::Bonus3,
        Self::TotalValue,
        Self::OfferPrice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Industry => "industry",
            Self::Product => "product",
            Self::Price => "price",
            Self::Goal => "goal",
            Self::OutcomeDescription => "outcome_description",
            Self::OutcomeValue => "outcome_value",
            Self::ProofElements => "proof_elements",
            Self::SuccessStory => "success_story",
            Self::Credibility => "credibility",
            Self::TimeToResults => "time_to_results",
            Self::Acceleration => "acceleration",
            Self::Speed => "speed",
            Self::EffortRequired => "effort_required",
            Self::EffortReduction => "effort_reduction",
            Self::Ease => "ease",
            Self::Guarantees => "guarantees",
            Self::GuaranteeStatement => "guarantee_statement",
            Self::RiskReversal => "risk_reversal",
            Self::CoreOffer => "core_offer",
            Self::Bonus1 => "bonus_1",
            Self::Bonus2 => "bonus_2",
            Self::Bonus3 => "bonus_3",
            Self::TotalValue => "total_value",
            Self::OfferPrice => "offer_price",
        }
    }

    /// The step that asks for this field.
    pub fn step(&self) -> WizardStep {
        match self {
            Self::Industry | Self::Product | Self::Price | Self::Goal => WizardStep::BusinessBasics,
            Self::OutcomeDescription | Self::OutcomeValue => WizardStep::DreamOutcome,
            Self::ProofElements | Self::SuccessStory | Self::Credibility => WizardStep::Likelihood,
            Self::TimeToResults | Self::Acceleration | Self::Speed => WizardStep::TimeDelay,
            Self::EffortRequired | Self::EffortReduction | Self::Ease => WizardStep::Effort,
            Self::Guarantees | Self::GuaranteeStatement | Self::RiskReversal => {
                WizardStep::RiskReversal
            }
            Self::CoreOffer
            | Self::Bonus1
            | Self::Bonus2
            | Self::Bonus3
            | Self::TotalValue
            | Self::OfferPrice => WizardStep::ValueStack,
        }
    }

    /// The question shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Industry => "What industry are you in?",
            Self::Product => "What is your primary product or service?",
            Self::Price => "What is your current price point?",
            Self::Goal => "What's the primary goal of this offer?",
            Self::OutcomeDescription => "Describe the exact outcome your ideal customer desires:",
            Self::OutcomeValue => "How valuable is this outcome to your customer?",
            Self::ProofElements => "What proof elements do you have?",
            Self::SuccessStory => "What's your most compelling success story or data point?",
            Self::Credibility => "Rate how strong your proof is",
            Self::TimeToResults => "How long does it typically take to see results?",
            Self::Acceleration => "How can you accelerate results or provide quick wins?",
            Self::Speed => "Rate how quickly your solution delivers results (higher is faster)",
            Self::EffortRequired => "What effort is required from the customer?",
            Self::EffortReduction => "How can you reduce this effort?",
            Self::Ease => "Rate how easy it is to use your solution (higher is easier)",
            Self::Guarantees => "What guarantees can you offer?",
            Self::GuaranteeStatement => "What specific guarantee statement will you make?",
            Self::RiskReversal => "Risk Reversal Rating",
            Self::CoreOffer => "Core Offer - What's the main product/service?",
            Self::Bonus1 => "Bonus #1 - What can you add that's valuable but low-cost to you?",
            Self::Bonus2 => "Bonus #2 - What else can you include?",
            Self::Bonus3 => "Bonus #3 - Any additional bonuses?",
            Self::TotalValue => "What's the total value of everything combined? ($)",
            Self::OfferPrice => "What price will you charge? ($)",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Industry => FieldKind::Select {
                options: INDUSTRY_OPTIONS,
            },
            Self::Price => FieldKind::Select {
                options: PRICE_OPTIONS,
            },
            Self::Goal => FieldKind::Select {
                options: GOAL_OPTIONS,
            },
            Self::TimeToResults => FieldKind::Select {
                options: TIME_OPTIONS,
            },
            Self::ProofElements => FieldKind::MultiSelect {
                options: PROOF_OPTIONS,
            },
            Self::Guarantees => FieldKind::MultiSelect {
                options: GUARANTEE_OPTIONS,
            },
            Self::Product | Self::GuaranteeStatement => FieldKind::ShortText,
            Self::OutcomeDescription
            | Self::SuccessStory
            | Self::Acceleration
            | Self::EffortRequired
            | Self::EffortReduction
            | Self::CoreOffer
            | Self::Bonus1
            | Self::Bonus2
            | Self::Bonus3 => FieldKind::LongText,
            Self::OutcomeValue | Self::Credibility | Self::Speed | Self::Ease | Self::RiskReversal => {
                FieldKind::Rating {
                    min: RATING_MIN,
                    max: RATING_MAX,
                    default: RATING_DEFAULT,
                }
            }
            Self::TotalValue => FieldKind::Number {
                min: MONEY_MIN,
                max: MONEY_MAX,
                default: TOTAL_VALUE_DEFAULT,
            },
            Self::OfferPrice => FieldKind::Number {
                min: MONEY_MIN,
                max: MONEY_MAX,
                default: OFFER_PRICE_DEFAULT,
            },
        }
    }

    /// Check a submitted value against this field's input kind.
    pub fn validate(&self, value: &FieldValue) -> Result<(), WizardError> {
        let invalid = |reason: String| WizardError::InvalidValue {
            field: *self,
            reason,
        };

        match (self.kind(), value) {
            (FieldKind::ShortText | FieldKind::LongText, FieldValue::Text(_)) => Ok(()),
            (FieldKind::Select { options }, FieldValue::Text(choice)) => {
                if options.iter().any(|o| *o == choice.as_str()) {
                    Ok(())
                } else {
                    Err(invalid(format!("'{choice}' is not one of {options:?}")))
                }
            }
            (FieldKind::MultiSelect { options }, FieldValue::Choices(choices)) => {
                match choices
                    .iter()
                    .find(|c| !options.iter().any(|o| *o == c.as_str()))
                {
                    Some(unknown) => Err(invalid(format!("'{unknown}' is not one of {options:?}"))),
                    None => Ok(()),
                }
            }
            (FieldKind::Rating { min, max, .. }, FieldValue::Integer(n))
            | (FieldKind::Number { min, max, .. }, FieldValue::Integer(n)) => {
                if (min..=max).contains(n) {
                    Ok(())
                } else {
                    Err(invalid(format!("{n} is outside {min}..={max}")))
                }
            }
            // Kept verbatim; the scoring engine applies its fallback when it
            // cannot read the number.
            (FieldKind::Number { .. }, FieldValue::Text(_)) => Ok(()),
            (kind, value) => Err(invalid(format!(
                "expected {}, got {}",
                kind.describe(),
                value.describe()
            ))),
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FieldKey {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| WizardError::UnknownField(s.to_string()))
    }
}

/// How a field is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    ShortText,
    LongText,
    Select { options: &'static [&'static str] },
    MultiSelect { options: &'static [&'static str] },
    Rating { min: i64, max: i64, default: i64 },
    Number { min: i64, max: i64, default: i64 },
}

impl FieldKind {
    fn describe(&self) -> &'static str {
        match self {
            Self::ShortText | Self::LongText => "text",
            Self::Select { .. } => "one option",
            Self::MultiSelect { .. } => "a list of options",
            Self::Rating { .. } => "a rating",
            Self::Number { .. } => "a number",
        }
    }
}

/// A submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    Choices(BTreeSet<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices(values.into_iter().map(Into::into).collect())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer reading: integers as is, text only when it parses cleanly.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Choices(_) => None,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::Integer(_) => "a number",
            Self::Text(_) => "text",
            Self::Choices(_) => "a list",
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Choices(choices) => {
                let joined: Vec<&str> = choices.iter().map(String::as_str).collect();
                write!(f, "{}", joined.join(", "))
            }
        }
    }
}
