//! Value-equation scoring.
//!
//! `score` is pure: it reads a response store, substitutes defaults for
//! anything missing, and never fails.

use serde::Serialize;

use crate::wizard::fields::{OFFER_PRICE_DEFAULT, RATING_DEFAULT, TOTAL_VALUE_DEFAULT};
use crate::wizard::{FieldKey, ResponseStore};

use super::recommendations::{Recommendation, recommend};

/// Ratio used when either monetary field cannot be read as an integer.
/// Both values are discarded together, not just the unreadable one.
pub const FALLBACK_PRICE_RATIO: f64 = 2.0;

/// Multiplier that brings the value equation into a readable range.
pub const VALUE_SCALE: f64 = 10.0;

pub const VALUE_WEIGHT: f64 = 0.5;
pub const PRICE_RATIO_WEIGHT: f64 = 0.3;
pub const RISK_WEIGHT: f64 = 0.2;

pub const MIN_OVERALL: f64 = 0.0;
pub const MAX_OVERALL: f64 = 100.0;

/// The four value-equation inputs, as raw 1-10 ratings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueFactors {
    pub dream_outcome: f64,
    pub likelihood: f64,
    /// Raw speed rating; higher means faster results.
    pub time_delay: f64,
    /// Raw ease rating; higher means less effort.
    pub effort: f64,
}

impl ValueFactors {
    pub fn from_responses(responses: &ResponseStore) -> Self {
        Self {
            dream_outcome: read_rating(responses, FieldKey::OutcomeValue),
            likelihood: read_rating(responses, FieldKey::Credibility),
            time_delay: read_rating(responses, FieldKey::Speed),
            effort: read_rating(responses, FieldKey::Ease),
        }
    }

    /// Inverted speed: faster results give a smaller divisor.
    pub fn time_delay_factor(&self) -> f64 {
        (11.0 - self.time_delay).max(1.0)
    }

    /// Inverted ease: easier solutions give a smaller divisor.
    pub fn effort_factor(&self) -> f64 {
        (11.0 - self.effort).max(1.0)
    }

    /// (dream outcome × likelihood) / (time delay × effort), scaled.
    pub fn value_score(&self) -> f64 {
        (self.dream_outcome * self.likelihood) / (self.time_delay_factor() * self.effort_factor())
            * VALUE_SCALE
    }
}

/// Output of one scoring pass. Recomputed on every view of the results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub factors: ValueFactors,
    pub value_score: f64,
    pub price_ratio: f64,
    pub risk_score: i64,
    /// Weighted total, clamped to 0..=100.
    pub overall_score: f64,
    pub recommendations: Vec<Recommendation>,
}

/// Score an offer from its responses.
pub fn score(responses: &ResponseStore) -> ScoreResult {
    let factors = ValueFactors::from_responses(responses);
    let value_score = factors.value_score();
    let price_ratio = price_ratio(responses);
    let risk_score = read_integer(responses, FieldKey::RiskReversal, RATING_DEFAULT);

    let overall_score = (value_score * VALUE_WEIGHT
        + price_ratio * PRICE_RATIO_WEIGHT
        + risk_score as f64 * RISK_WEIGHT)
        .clamp(MIN_OVERALL, MAX_OVERALL);

    let recommendations = recommend(&factors, value_score, price_ratio, risk_score);

    ScoreResult {
        factors,
        value_score,
        price_ratio,
        risk_score,
        overall_score,
        recommendations,
    }
}

/// Total value over offer price, with the price floored at 1.
pub fn price_ratio(responses: &ResponseStore) -> f64 {
    let total_value = read_money(responses, FieldKey::TotalValue, TOTAL_VALUE_DEFAULT);
    let offer_price = read_money(responses, FieldKey::OfferPrice, OFFER_PRICE_DEFAULT);

    match (total_value, offer_price) {
        (Some(value), Some(price)) => value as f64 / price.max(1) as f64,
        _ => FALLBACK_PRICE_RATIO,
    }
}

/// `Some(default)` when absent, `None` when present but not an integer.
fn read_money(responses: &ResponseStore, key: FieldKey, default: i64) -> Option<i64> {
    match responses.get(key) {
        None => Some(default),
        Some(value) => value.as_integer(),
    }
}

fn read_integer(responses: &ResponseStore, key: FieldKey, default: i64) -> i64 {
    responses
        .get(key)
        .and_then(|v| v.as_integer())
        .unwrap_or(default)
}

fn read_rating(responses: &ResponseStore, key: FieldKey) -> f64 {
    read_integer(responses, key, RATING_DEFAULT) as f64
}
