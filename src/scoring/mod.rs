//! Offer scoring: the value equation, price ratio, and the improvement
//! recommendations shown on the results step.

pub mod engine;
pub mod recommendations;
pub mod report;

pub use engine::{ScoreResult, ValueFactors, price_ratio, score};
pub use recommendations::Recommendation;
pub use report::{OfferSummary, PricingSummary, ScoreReport, ScoreTier, industry_examples};
