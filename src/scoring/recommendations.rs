//! Improvement recommendations derived from a scoring pass.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::engine::ValueFactors;

pub const VALUE_SCORE_THRESHOLD: f64 = 6.0;
pub const PRICE_RATIO_THRESHOLD: f64 = 3.0;
pub const RISK_THRESHOLD: i64 = 7;
pub const SPEED_THRESHOLD: f64 = 7.0;
pub const EASE_THRESHOLD: f64 = 7.0;

/// One suggested improvement. Rules are evaluated independently; the list
/// keeps the order of the variants below.
///
/// Serializes as `{"code", "title", "detail", "text"}` so HTTP clients get
/// the advice itself, not just the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    IncreaseValue,
    ImprovePriceRatio,
    StrengthenRiskReversal,
    ReduceTimeToResults,
    DecreaseEffort,
}

impl Recommendation {
    pub fn code(&self) -> &'static str {
        match self {
            Self::IncreaseValue => "increase_value",
            Self::ImprovePriceRatio => "improve_price_ratio",
            Self::StrengthenRiskReversal => "strengthen_risk_reversal",
            Self::ReduceTimeToResults => "reduce_time_to_results",
            Self::DecreaseEffort => "decrease_effort",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::IncreaseValue => "Increase Value",
            Self::ImprovePriceRatio => "Improve Value-to-Price Ratio",
            Self::StrengthenRiskReversal => "Strengthen Risk Reversal",
            Self::ReduceTimeToResults => "Reduce Time to Results",
            Self::DecreaseEffort => "Decrease Required Effort",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            Self::IncreaseValue => {
                "Make your dream outcome more compelling or improve credibility."
            }
            Self::ImprovePriceRatio => "Add more bonuses or adjust pricing.",
            Self::StrengthenRiskReversal => "Offer a more compelling guarantee.",
            Self::ReduceTimeToResults => "Find ways to deliver faster results or early wins.",
            Self::DecreaseEffort => "Make your solution easier to implement.",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title(), self.detail())
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Recommendation", 4)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("title", self.title())?;
        state.serialize_field("detail", self.detail())?;
        state.serialize_field("text", &self.to_string())?;
        state.end()
    }
}

pub(crate) fn recommend(
    factors: &ValueFactors,
    value_score: f64,
    price_ratio: f64,
    risk_score: i64,
) -> Vec<Recommendation> {
    let rules = [
        (value_score < VALUE_SCORE_THRESHOLD, Recommendation::IncreaseValue),
        (price_ratio < PRICE_RATIO_THRESHOLD, Recommendation::ImprovePriceRatio),
        (risk_score < RISK_THRESHOLD, Recommendation::StrengthenRiskReversal),
        // Raw ratings, not the inverted factors.
        (factors.time_delay < SPEED_THRESHOLD, Recommendation::ReduceTimeToResults),
        (factors.effort < EASE_THRESHOLD, Recommendation::DecreaseEffort),
    ];

    rules
        .into_iter()
        .filter_map(|(fires, rec)| fires.then_some(rec))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score;
    use crate::wizard::{FieldKey, FieldValue, ResponseStore};

    #[test]
    fn strong_offer_has_no_recommendations() {
        let responses: ResponseStore = [
            (FieldKey::Speed, FieldValue::Integer(10)),
            (FieldKey::Ease, FieldValue::Integer(10)),
            (FieldKey::Credibility, FieldValue::Integer(10)),
            (FieldKey::OutcomeValue, FieldValue::Integer(10)),
            (FieldKey::RiskReversal, FieldValue::Integer(10)),
            (FieldKey::TotalValue, FieldValue::Integer(3000)),
            (FieldKey::OfferPrice, FieldValue::Integer(500)),
        ]
        .into_iter()
        .collect();
        assert!(score(&responses).recommendations.is_empty());
    }

    #[test]
    fn defaults_trigger_four_in_order() {
        // Default value score is 25/36 * 10, above the value threshold.
        let result = score(&ResponseStore::new());
        assert_eq!(
            result.recommendations,
            vec![
                Recommendation::ImprovePriceRatio,
                Recommendation::StrengthenRiskReversal,
                Recommendation::ReduceTimeToResults,
                Recommendation::DecreaseEffort,
            ]
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let factors = ValueFactors {
            dream_outcome: 5.0,
            likelihood: 5.0,
            time_delay: 7.0,
            effort: 7.0,
        };
        assert!(recommend(&factors, 6.0, 3.0, 7).is_empty());

        let recs = recommend(&factors, 5.99, 3.0, 6);
        assert_eq!(
            recs,
            vec![Recommendation::IncreaseValue, Recommendation::StrengthenRiskReversal]
        );
    }

    #[test]
    fn display_joins_title_and_detail() {
        assert_eq!(
            Recommendation::ImprovePriceRatio.to_string(),
            "Improve Value-to-Price Ratio: Add more bonuses or adjust pricing."
        );
    }

    #[test]
    fn serializes_with_advice_text() {
        let json = serde_json::to_value(Recommendation::DecreaseEffort).unwrap();
        assert_eq!(json["code"], "decrease_effort");
        assert_eq!(json["title"], "Decrease Required Effort");
        assert_eq!(json["detail"], "Make your solution easier to implement.");
        assert_eq!(
            json["text"],
            "Decrease Required Effort: Make your solution easier to implement."
        );
    }
}
