//! Wizard state machine: tracks which step the user is on.

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

use super::fields::FieldKey;

/// The steps of the offer wizard.
///
/// Progresses linearly: Intro → BusinessBasics → DreamOutcome → Likelihood →
/// TimeDelay → Effort → RiskReversal → ValueStack → Results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Intro,
    BusinessBasics,
    DreamOutcome,
    Likelihood,
    TimeDelay,
    Effort,
    RiskReversal,
    ValueStack,
    Results,
}

impl WizardStep {
    pub const ALL: [WizardStep; 9] = [
        Self::Intro,
        Self::BusinessBasics,
        Self::DreamOutcome,
        Self::Likelihood,
        Self::TimeDelay,
        Self::Effort,
        Self::RiskReversal,
        Self::ValueStack,
        Self::Results,
    ];

    /// Number of steps.
    pub const COUNT: usize = Self::ALL.len();

    /// Zero-based position in the wizard.
    pub fn index(&self) -> usize {
        match self {
            Self::Intro => 0,
            Self::BusinessBasics => 1,
            Self::DreamOutcome => 2,
            Self::Likelihood => 3,
            Self::TimeDelay => 4,
            Self::Effort => 5,
            Self::RiskReversal => 6,
            Self::ValueStack => 7,
            Self::Results => 8,
        }
    }

    pub fn from_index(index: usize) -> Option<WizardStep> {
        Self::ALL.get(index).copied()
    }

    pub fn next(&self) -> Option<WizardStep> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_first(&self) -> bool {
        matches!(self, Self::Intro)
    }

    /// Whether this is the results step (no further step).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Results)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Intro => "Build Your No-Brainer Offer",
            Self::BusinessBasics => "Step 1: Your Business Basics",
            Self::DreamOutcome => "Step 2: Dream Outcome",
            Self::Likelihood => "Step 3: Perceived Likelihood of Achievement",
            Self::TimeDelay => "Step 4: Time to Results",
            Self::Effort => "Step 5: Effort & Sacrifice",
            Self::RiskReversal => "Step 6: Risk Reversal",
            Self::ValueStack => "Step 7: Value Stack",
            Self::Results => "Your No-Brainer Offer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Intro => {
                "This tool walks you through building an irresistible offer: \
                 step-by-step guidance, industry-specific examples, value scoring, \
                 and recommendations to improve your offer."
            }
            Self::BusinessBasics => "Tell us about your business and what this offer should achieve.",
            Self::DreamOutcome => "What result or transformation does your customer truly want?",
            Self::Likelihood => {
                "How confident will customers be that your solution will work for them?"
            }
            Self::TimeDelay => "How quickly can customers expect to see results?",
            Self::Effort => "What must the customer give up or do to get results?",
            Self::RiskReversal => "How can you eliminate the risk for your customer?",
            Self::ValueStack => {
                "What additional value can you add to make your offer irresistible?"
            }
            Self::Results => "Your offer summary, score, and suggested improvements.",
        }
    }

    /// Fields asked on this step, in display order.
    pub fn fields(&self) -> &'static [FieldKey] {
        use FieldKey::*;
        match self {
            Self::Intro | Self::Results => &[],
            Self::BusinessBasics => &[Industry, Product, Price, Goal],
            Self::DreamOutcome => &[OutcomeDescription, OutcomeValue],
            Self::Likelihood => &[ProofElements, SuccessStory, Credibility],
            Self::TimeDelay => &[TimeToResults, Acceleration, Speed],
            Self::Effort => &[EffortRequired, EffortReduction, Ease],
            Self::RiskReversal => &[Guarantees, GuaranteeStatement, RiskReversal],
            Self::ValueStack => &[CoreOffer, Bonus1, Bonus2, Bonus3, TotalValue, OfferPrice],
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Intro => "intro",
            Self::BusinessBasics => "business_basics",
            Self::DreamOutcome => "dream_outcome",
            Self::Likelihood => "likelihood",
            Self::TimeDelay => "time_delay",
            Self::Effort => "effort",
            Self::RiskReversal => "risk_reversal",
            Self::ValueStack => "value_stack",
            Self::Results => "results",
        };
        write!(f, "{s}")
    }
}

/// Position of one session in the wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    pub step: WizardStep,
}

impl WizardState {
    /// Move to the next step. Fails at the results step, leaving the state
    /// unchanged.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let next = self.step.next().ok_or(WizardError::AtLastStep)?;
        self.step = next;
        Ok(next)
    }

    /// Move to the previous step. Fails at the intro step, leaving the state
    /// unchanged.
    pub fn retreat(&mut self) -> Result<WizardStep, WizardError> {
        let previous = self.step.previous().ok_or(WizardError::AtFirstStep)?;
        self.step = previous;
        Ok(previous)
    }

    pub fn reset(&mut self) {
        self.step = WizardStep::Intro;
    }
}
