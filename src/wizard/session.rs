//! One user's pass through the wizard.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::advisor::{AdviceCategory, AdviceRequest, BusinessContext, OfferAnalysis, SuggestionCache};
use crate::error::WizardError;
use crate::scoring::ScoreReport;

use super::fields::{FieldKey, FieldKind, FieldValue};
use super::responses::ResponseStore;
use super::state::{WizardState, WizardStep};

/// Per-session wizard context: position, answers, and the advice memo.
/// Nothing here is shared between sessions.
#[derive(Debug, Clone)]
pub struct WizardSession {
    id: Uuid,
    state: WizardState,
    responses: ResponseStore,
    /// Inputs entered on a step but not yet committed by `advance`.
    pending: HashMap<FieldKey, FieldValue>,
    cache: SuggestionCache,
    last_score: f64,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            state: WizardState::default(),
            responses: ResponseStore::new(),
            pending: HashMap::new(),
            cache: SuggestionCache::new(),
            last_score: 0.0,
            created_at: now,
            last_active: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> WizardStep {
        self.state.step
    }

    pub fn responses(&self) -> &ResponseStore {
        &self.responses
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }

    /// Overall score from the last results view; 0 until scored.
    pub fn last_score(&self) -> f64 {
        self.last_score
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Record one pending input for the current step.
    pub fn set_input(&mut self, key: FieldKey, value: FieldValue) -> Result<(), WizardError> {
        self.check_input(key, &value)?;
        self.pending.insert(key, value);
        Ok(())
    }

    /// Record several pending inputs. Nothing is stored unless all are valid.
    pub fn set_inputs<I>(&mut self, inputs: I) -> Result<(), WizardError>
    where
        I: IntoIterator<Item = (FieldKey, FieldValue)>,
    {
        let inputs: Vec<_> = inputs.into_iter().collect();
        for (key, value) in &inputs {
            self.check_input(*key, value)?;
        }
        self.pending.extend(inputs);
        Ok(())
    }

    fn check_input(&self, key: FieldKey, value: &FieldValue) -> Result<(), WizardError> {
        let step = self.state.step;
        if key.step() != step {
            return Err(WizardError::FieldNotOnStep { field: key, step });
        }
        key.validate(value)
    }

    /// Value shown for a field: the pending input if any, else the committed one.
    pub fn current_value(&self, key: FieldKey) -> Option<&FieldValue> {
        self.pending.get(&key).or_else(|| self.responses.get(key))
    }

    /// Like `current_value`, but rating and number fields fall back to their
    /// defaults.
    pub fn display_value(&self, key: FieldKey) -> Option<FieldValue> {
        self.current_value(key).cloned().or_else(|| match key.kind() {
            FieldKind::Rating { default, .. } | FieldKind::Number { default, .. } => {
                Some(FieldValue::Integer(default))
            }
            _ => None,
        })
    }

    /// Commit the current step's pending inputs, then move forward. Inputs
    /// left pending on other steps stay pending until their own step is
    /// submitted. At the results step nothing is committed and the move is
    /// rejected.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let current = self.state.step;
        if current.is_terminal() {
            return Err(WizardError::AtLastStep);
        }

        let submitted: Vec<FieldKey> = self
            .pending
            .keys()
            .copied()
            .filter(|key| key.step() == current)
            .collect();
        let committed = submitted.len();
        for key in submitted {
            if let Some(value) = self.pending.remove(&key) {
                self.responses.insert(key, value);
            }
        }
        let step = self.state.advance()?;

        info!(session_id = %self.id, step = %step, committed, "Advanced wizard");
        Ok(step)
    }

    /// Move back one step. Committed and pending values are kept.
    pub fn retreat(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.state.retreat()?;
        info!(session_id = %self.id, step = %step, "Retreated wizard");
        Ok(step)
    }

    /// Forget everything and return to the intro. Idempotent.
    pub fn restart(&mut self) {
        self.state.reset();
        self.responses.clear();
        self.pending.clear();
        self.cache.clear();
        self.last_score = 0.0;
        info!(session_id = %self.id, "Restarted wizard");
    }

    /// Score the committed responses and remember the overall score.
    pub fn score_report(&mut self) -> ScoreReport {
        let report = ScoreReport::build(&self.responses);
        self.last_score = report.score.overall_score;
        debug!(
            session_id = %self.id,
            overall = report.score.overall_score,
            tier = ?report.tier,
            "Scored offer"
        );
        report
    }

    pub fn business_context(&self) -> BusinessContext {
        BusinessContext::from_responses(&self.responses)
    }

    /// Answer from the cache, or describe the advisor call still needed.
    pub fn advice_request(&self, category: AdviceCategory, input: &str) -> AdviceRequest {
        match self.cache.get(category, input) {
            Some(text) => AdviceRequest::Cached(text.to_string()),
            None => AdviceRequest::Pending {
                category,
                input: input.to_string(),
                context: self.business_context(),
            },
        }
    }

    /// Store an advisor answer. Error text is not cached. Returns whether the
    /// answer was stored.
    pub fn record_advice(&mut self, category: AdviceCategory, input: &str, text: &str) -> bool {
        if text.starts_with("Error:") {
            return false;
        }
        self.cache.insert(category, input, text.to_string());
        true
    }

    /// Write prefilled business basics. Pending inputs for the written
    /// fields are dropped so the prefilled values show. A fallback analysis
    /// writes nothing.
    pub fn apply_prefill(&mut self, analysis: &OfferAnalysis) -> Vec<FieldKey> {
        if analysis.is_fallback() {
            info!(session_id = %self.id, "Prefill analysis unreadable; responses untouched");
            return Vec::new();
        }

        let written = analysis.apply_to(&mut self.responses);
        for key in &written {
            self.pending.remove(key);
        }
        info!(session_id = %self.id, fields = written.len(), "Applied website prefill");
        written
    }

    pub fn view(&self) -> SessionView {
        let step = self.state.step;
        let fields = step
            .fields()
            .iter()
            .map(|&key| FieldView {
                key,
                label: key.label(),
                input: key.kind(),
                value: self.display_value(key),
                pending: self.pending.contains_key(&key),
            })
            .collect();

        SessionView {
            id: self.id,
            step,
            step_index: step.index(),
            step_count: WizardStep::COUNT,
            title: step.title(),
            description: step.description(),
            fields,
            can_go_back: !step.is_first(),
            can_advance: !step.is_terminal(),
            last_score: self.last_score,
            created_at: self.created_at,
            last_active: self.last_active,
        }
    }
}

/// Snapshot of a session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub step: WizardStep,
    pub step_index: usize,
    pub step_count: usize,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: Vec<FieldView>,
    pub can_go_back: bool,
    pub can_advance: bool,
    pub last_score: f64,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub key: FieldKey,
    pub label: &'static str,
    pub input: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    pub pending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(step: WizardStep) -> WizardSession {
        let mut session = WizardSession::new();
        while session.step() != step {
            session.advance().unwrap();
        }
        session
    }

    #[test]
    fn new_session_starts_at_intro() {
        let session = WizardSession::new();
        assert_eq!(session.step(), WizardStep::Intro);
        assert!(session.responses().is_empty());
        assert_eq!(session.last_score(), 0.0);
    }

    #[test]
    fn advance_commits_pending_inputs() {
        let mut session = at(WizardStep::BusinessBasics);
        session
            .set_input(FieldKey::Industry, FieldValue::text("Coaching"))
            .unwrap();
        assert!(session.responses().get(FieldKey::Industry).is_none());

        session.advance().unwrap();
        assert_eq!(session.responses().text(FieldKey::Industry), Some("Coaching"));
    }

    #[test]
    fn advance_overwrites_prior_value() {
        let mut session = at(WizardStep::BusinessBasics);
        session.set_input(FieldKey::Product, FieldValue::text("v1")).unwrap();
        session.advance().unwrap();
        session.retreat().unwrap();
        session.set_input(FieldKey::Product, FieldValue::text("v2")).unwrap();
        session.advance().unwrap();
        assert_eq!(session.responses().text(FieldKey::Product), Some("v2"));
    }

    #[test]
    fn advance_leaves_later_step_inputs_pending() {
        let mut session = at(WizardStep::DreamOutcome);
        session.set_input(FieldKey::OutcomeValue, FieldValue::Integer(9)).unwrap();
        session.retreat().unwrap();
        session.set_input(FieldKey::Industry, FieldValue::text("SaaS")).unwrap();
        session.advance().unwrap();

        assert_eq!(session.step(), WizardStep::DreamOutcome);
        assert_eq!(session.responses().text(FieldKey::Industry), Some("SaaS"));
        assert!(session.responses().get(FieldKey::OutcomeValue).is_none());
        assert_eq!(session.current_value(FieldKey::OutcomeValue), Some(&FieldValue::Integer(9)));

        session.advance().unwrap();
        assert_eq!(session.responses().get(FieldKey::OutcomeValue), Some(&FieldValue::Integer(9)));
    }

    #[test]
    fn retreat_preserves_entered_values() {
        let mut session = at(WizardStep::DreamOutcome);
        session.set_input(FieldKey::OutcomeValue, FieldValue::Integer(8)).unwrap();
        session.advance().unwrap();
        session.retreat().unwrap();

        assert_eq!(session.step(), WizardStep::DreamOutcome);
        assert_eq!(session.current_value(FieldKey::OutcomeValue), Some(&FieldValue::Integer(8)));
    }

    #[test]
    fn restart_then_read_returns_defaults() {
        let mut session = at(WizardStep::DreamOutcome);
        session.set_input(FieldKey::OutcomeValue, FieldValue::Integer(9)).unwrap();
        session.advance().unwrap();
        session.record_advice(AdviceCategory::Bonuses, "x", "advice");
        session.score_report();

        session.restart();
        assert_eq!(session.step(), WizardStep::Intro);
        assert!(session.current_value(FieldKey::OutcomeValue).is_none());
        assert_eq!(session.display_value(FieldKey::OutcomeValue), Some(FieldValue::Integer(5)));
        assert_eq!(session.display_value(FieldKey::OfferPrice), Some(FieldValue::Integer(500)));
        assert!(session.display_value(FieldKey::Product).is_none());
        assert!(session.cache().is_empty());
        assert_eq!(session.last_score(), 0.0);

        session.restart();
        assert_eq!(session.step(), WizardStep::Intro);
    }

    #[test]
    fn out_of_range_moves_are_rejected() {
        let mut session = WizardSession::new();
        assert!(matches!(session.retreat(), Err(WizardError::AtFirstStep)));

        let mut session = at(WizardStep::Results);
        assert!(matches!(session.advance(), Err(WizardError::AtLastStep)));
        assert_eq!(session.step(), WizardStep::Results);
    }

    #[test]
    fn input_must_belong_to_current_step() {
        let mut session = at(WizardStep::BusinessBasics);
        let err = session
            .set_input(FieldKey::Speed, FieldValue::Integer(7))
            .unwrap_err();
        assert!(matches!(
            err,
            WizardError::FieldNotOnStep {
                field: FieldKey::Speed,
                step: WizardStep::BusinessBasics
            }
        ));
    }

    #[test]
    fn set_inputs_is_all_or_nothing() {
        let mut session = at(WizardStep::DreamOutcome);
        let result = session.set_inputs([
            (FieldKey::OutcomeDescription, FieldValue::text("Run a marathon")),
            (FieldKey::OutcomeValue, FieldValue::Integer(11)),
        ]);
        assert!(matches!(result, Err(WizardError::InvalidValue { .. })));
        assert!(session.current_value(FieldKey::OutcomeDescription).is_none());

        session
            .set_inputs([
                (FieldKey::OutcomeDescription, FieldValue::text("Run a marathon")),
                (FieldKey::OutcomeValue, FieldValue::Integer(10)),
            ])
            .unwrap();
        assert!(session.view().fields.iter().all(|f| f.pending));
    }

    #[test]
    fn score_report_remembers_last_score() {
        let mut session = at(WizardStep::Results);
        let report = session.score_report();
        assert!((report.score.overall_score - 5.072).abs() < 0.001);
        assert_eq!(session.last_score(), report.score.overall_score);
    }

    #[test]
    fn advice_is_cached_per_category_and_input() {
        let mut session = WizardSession::new();
        let request = session.advice_request(AdviceCategory::Bonuses, "course");
        assert!(matches!(request, AdviceRequest::Pending { .. }));

        assert!(session.record_advice(AdviceCategory::Bonuses, "course", "Add a workbook"));
        assert_eq!(
            session.advice_request(AdviceCategory::Bonuses, "course"),
            AdviceRequest::Cached("Add a workbook".into())
        );
        assert!(matches!(
            session.advice_request(AdviceCategory::RiskReversal, "course"),
            AdviceRequest::Pending { .. }
        ));
    }

    #[test]
    fn error_advice_is_not_cached() {
        let mut session = WizardSession::new();
        assert!(!session.record_advice(AdviceCategory::Bonuses, "course", "Error: timeout"));
        assert!(session.cache().is_empty());
    }

    #[test]
    fn pending_request_carries_business_context() {
        let mut session = at(WizardStep::BusinessBasics);
        session.set_input(FieldKey::Industry, FieldValue::text("SaaS")).unwrap();
        session.advance().unwrap();

        match session.advice_request(AdviceCategory::DreamOutcome, "faster invoicing") {
            AdviceRequest::Pending { context, .. } => {
                assert_eq!(context.industry.as_deref(), Some("SaaS"));
            }
            other => panic!("expected pending request, got {other:?}"),
        }
    }

    #[test]
    fn prefill_overrides_pending_inputs() {
        let mut session = at(WizardStep::BusinessBasics);
        session.set_input(FieldKey::Industry, FieldValue::text("Services")).unwrap();

        let analysis = OfferAnalysis::parse(r#"{"industry": "Coaching", "product": "Courses", "offer_score": 6}"#);
        let written = session.apply_prefill(&analysis);

        assert_eq!(written, vec![FieldKey::Industry, FieldKey::Product]);
        assert_eq!(session.current_value(FieldKey::Industry), Some(&FieldValue::text("Coaching")));
    }

    #[test]
    fn unreadable_prefill_keeps_saved_answers() {
        let mut session = at(WizardStep::BusinessBasics);
        session.set_input(FieldKey::Industry, FieldValue::text("Services")).unwrap();
        session.advance().unwrap();

        let written = session.apply_prefill(&OfferAnalysis::parse("no json here"));

        assert!(written.is_empty());
        assert_eq!(session.responses().text(FieldKey::Industry), Some("Services"));
    }

    #[test]
    fn view_describes_current_step() {
        let session = at(WizardStep::Results);
        let view = session.view();
        assert_eq!(view.step_index, 8);
        assert!(view.can_go_back);
        assert!(!view.can_advance);
        assert!(view.fields.is_empty());

        let view = WizardSession::new().view();
        assert!(!view.can_go_back);
        assert_eq!(view.title, "Build Your No-Brainer Offer");
    }
}
