//! Structured offer analysis, parsed best-effort from model output.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::wizard::fields::{INDUSTRY_OPTIONS, PRICE_OPTIONS};
use crate::wizard::{FieldKey, FieldValue, ResponseStore};

/// Industry used when the model's answer does not match a known option.
pub const FALLBACK_INDUSTRY: &str = "Other";

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("valid regex"));

/// Assessment of an existing offer, from the offer-analysis category or a
/// website prefill. Unknown fields in the model output are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferAnalysis {
    #[serde(default = "fallback_industry")]
    pub industry: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub price_range: String,
    #[serde(default, deserialize_with = "string_list")]
    pub offer_elements: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub value_propositions: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub guarantees: Vec<String>,
    #[serde(default)]
    pub dream_outcome: String,
    /// 1-10 once parsed; 0 only in the fallback record.
    #[serde(default, deserialize_with = "lenient_score")]
    pub offer_score: u8,
    #[serde(default)]
    pub recommendation: String,
}

fn fallback_industry() -> String {
    FALLBACK_INDUSTRY.to_string()
}

impl OfferAnalysis {
    /// Record returned when the model output cannot be read.
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            industry: fallback_industry(),
            product: String::new(),
            price_range: String::new(),
            offer_elements: Vec::new(),
            value_propositions: Vec::new(),
            guarantees: Vec::new(),
            dream_outcome: String::new(),
            offer_score: 0,
            recommendation: reason.into(),
        }
    }

    /// Parse the first JSON object found in `text`, falling back on failure.
    pub fn parse(text: &str) -> Self {
        let Some(candidate) = extract_json_object(text) else {
            tracing::warn!(len = text.len(), "No JSON object in offer analysis output");
            return Self::fallback("Could not parse the analysis. Try again.");
        };

        match serde_json::from_str::<OfferAnalysis>(candidate) {
            Ok(mut analysis) => {
                analysis.offer_score = analysis.offer_score.clamp(1, 10);
                analysis
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse offer analysis JSON");
                Self::fallback(format!("Could not parse the analysis: {e}"))
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.offer_score == 0
    }

    /// Industry mapped onto the wizard's options.
    pub fn industry_option(&self) -> &'static str {
        match_option(INDUSTRY_OPTIONS, &self.industry).unwrap_or(FALLBACK_INDUSTRY)
    }

    /// Price band mapped onto the wizard's options, if it matches one.
    pub fn price_option(&self) -> Option<&'static str> {
        match_option(PRICE_OPTIONS, &self.price_range)
    }

    /// Prefill the business-basics answers. Returns the keys written.
    pub fn apply_to(&self, responses: &mut ResponseStore) -> Vec<FieldKey> {
        let mut written = vec![FieldKey::Industry];
        responses.insert(FieldKey::Industry, FieldValue::text(self.industry_option()));

        if !self.product.trim().is_empty() {
            responses.insert(FieldKey::Product, FieldValue::text(self.product.trim()));
            written.push(FieldKey::Product);
        }

        if let Some(price) = self.price_option() {
            responses.insert(FieldKey::Price, FieldValue::text(price));
            written.push(FieldKey::Price);
        }

        written
    }
}

fn match_option(options: &[&'static str], value: &str) -> Option<&'static str> {
    let wanted = normalize(value);
    options.iter().copied().find(|o| normalize(o) == wanted)
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '$')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Fenced block first, then the outermost braces.
fn extract_json_object(text: &str) -> Option<&str> {
    if let Some(caps) = CODE_FENCE.captures(text) {
        return caps.get(1).map(|m| m.as_str());
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Accepts a list of strings, a single string, or null.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<String>),
        One(String),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) if !item.trim().is_empty() => vec![item],
        _ => Vec::new(),
    })
}

/// Accepts integers, floats, or numeric strings; anything else reads as 0.
fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let score = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(score.round().clamp(0.0, 10.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "industry": "Coaching",
        "product": "Leadership coaching",
        "price_range": "$2,000-$10,000",
        "offer_elements": ["1:1 calls", "Slack access"],
        "value_propositions": ["Become a better manager"],
        "guarantees": "30-day refund",
        "dream_outcome": "Promoted within a year",
        "offer_score": 6,
        "recommendation": "Add a performance guarantee",
        "extra": "ignored"
    }"#;

    #[test]
    fn parses_plain_json() {
        let analysis = OfferAnalysis::parse(SAMPLE);
        assert_eq!(analysis.industry, "Coaching");
        assert_eq!(analysis.offer_elements.len(), 2);
        assert_eq!(analysis.guarantees, vec!["30-day refund"]);
        assert_eq!(analysis.offer_score, 6);
        assert!(!analysis.is_fallback());
    }

    #[test]
    fn parses_fenced_json_with_prose() {
        let text = format!("Here is my analysis:\n```json\n{SAMPLE}\n```\nHope this helps!");
        let analysis = OfferAnalysis::parse(&text);
        assert_eq!(analysis.product, "Leadership coaching");
    }

    #[test]
    fn parses_braces_embedded_in_prose() {
        let text = r#"Sure. {"industry": "SaaS", "offer_score": "8.4"} Done."#;
        let analysis = OfferAnalysis::parse(text);
        assert_eq!(analysis.industry, "SaaS");
        assert_eq!(analysis.offer_score, 8);
        assert!(analysis.offer_elements.is_empty());
    }

    #[test]
    fn score_clamped_into_range() {
        assert_eq!(OfferAnalysis::parse(r#"{"offer_score": 42}"#).offer_score, 10);
        assert_eq!(OfferAnalysis::parse(r#"{"offer_score": null}"#).offer_score, 1);
    }

    #[test]
    fn garbage_yields_fallback() {
        let analysis = OfferAnalysis::parse("I cannot help with that.");
        assert_eq!(analysis.industry, "Other");
        assert_eq!(analysis.offer_score, 0);
        assert!(analysis.is_fallback());

        let analysis = OfferAnalysis::parse("{ not json }");
        assert!(analysis.is_fallback());
        assert!(analysis.recommendation.contains("Could not parse"));
    }

    #[test]
    fn missing_industry_defaults_to_other() {
        let analysis = OfferAnalysis::parse(r#"{"product": "Widgets", "offer_score": 3}"#);
        assert_eq!(analysis.industry, "Other");
    }

    #[test]
    fn options_match_loosely() {
        let analysis = OfferAnalysis {
            industry: "ecommerce".into(),
            price_range: "$500 - $2,000".into(),
            ..OfferAnalysis::fallback("")
        };
        assert_eq!(analysis.industry_option(), "E-commerce");
        assert_eq!(analysis.price_option(), Some("$500-$2,000"));

        let unknown = OfferAnalysis {
            industry: "Agriculture".into(),
            price_range: "unknown".into(),
            ..OfferAnalysis::fallback("")
        };
        assert_eq!(unknown.industry_option(), "Other");
        assert!(unknown.price_option().is_none());
    }

    #[test]
    fn apply_writes_business_basics() {
        let analysis = OfferAnalysis::parse(SAMPLE);
        let mut responses = ResponseStore::new();
        let written = analysis.apply_to(&mut responses);

        assert_eq!(written, vec![FieldKey::Industry, FieldKey::Product, FieldKey::Price]);
        assert_eq!(responses.text(FieldKey::Industry), Some("Coaching"));
        assert_eq!(responses.text(FieldKey::Product), Some("Leadership coaching"));
        assert_eq!(responses.text(FieldKey::Price), Some("$2,000-$10,000"));
        assert!(responses.get(FieldKey::Guarantees).is_none());
    }

    #[test]
    fn apply_skips_blank_product_and_unknown_price() {
        let mut responses = ResponseStore::new();
        let written = OfferAnalysis::fallback("x").apply_to(&mut responses);
        assert_eq!(written, vec![FieldKey::Industry]);
        assert_eq!(responses.text(FieldKey::Industry), Some("Other"));
    }
}
