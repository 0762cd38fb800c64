//! Flow Session Entity
//!
//! Per-session conversational state: which top-level flow is active plus
//! the payload the loan flows accumulate. Created lazily on first use,
//! mutated every turn, and deleted on hand-off or abandonment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::action::LoanProduct;

/// The active top-level conversation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    /// No flow active; the next message is routed from scratch.
    #[default]
    None,
    /// Waiting for the user to pick a payment account.
    PaymentType,
    /// Waiting for the user to pick a loan product.
    LoanType,
    /// Waiting for the user to confirm the application handoff.
    LoanBegin,
    /// The field-collection wizard is running.
    LoanVerify,
}

impl Flow {
    /// Router state name exposed for diagnostics and tests.
    pub fn state_name(&self) -> &'static str {
        match self {
            Flow::None => "NONE",
            Flow::PaymentType => "AWAITING_PAYMENT_TYPE",
            Flow::LoanType => "AWAITING_LOAN_TYPE",
            Flow::LoanBegin => "AWAITING_LOAN_BEGIN_CONFIRMATION",
            Flow::LoanVerify => "IN_LOAN_VERIFICATION",
        }
    }
}

/// Progress of the wizard attached to a session in `LoanVerify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardProgress {
    /// Wizard session id handed back to the client on each input request.
    pub wizard_session_id: String,
    /// 1-based step currently being asked.
    pub step_number: usize,
    /// Total steps fixed at wizard start.
    pub total_steps: usize,
}

/// Conversational state for one session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSession {
    /// Active flow.
    pub flow: Flow,
    /// Loan product chosen in the loan flows.
    pub loan_type: Option<LoanProduct>,
    /// Form identifier selected for the loan handoff.
    pub form_id: Option<String>,
    /// Wizard progress while in `LoanVerify`.
    pub wizard: Option<WizardProgress>,
    /// Last turn timestamp, used for idle expiry.
    pub last_active: DateTime<Utc>,
}

impl FlowSession {
    /// Fresh session with no flow active.
    pub fn new() -> Self {
        Self {
            flow: Flow::None,
            loan_type: None,
            form_id: None,
            wizard: None,
            last_active: Utc::now(),
        }
    }

    /// Session entering the payment account selection flow.
    pub fn awaiting_payment_type() -> Self {
        Self {
            flow: Flow::PaymentType,
            ..Self::new()
        }
    }

    /// Session entering the loan product selection flow.
    pub fn awaiting_loan_type() -> Self {
        Self {
            flow: Flow::LoanType,
            ..Self::new()
        }
    }

    /// Session awaiting the begin-application confirmation.
    pub fn awaiting_loan_begin(loan_type: LoanProduct, form_id: impl Into<String>) -> Self {
        Self {
            flow: Flow::LoanBegin,
            loan_type: Some(loan_type),
            form_id: Some(form_id.into()),
            ..Self::new()
        }
    }

    /// Session with an active verification wizard.
    pub fn in_loan_verification(
        loan_type: Option<LoanProduct>,
        form_id: impl Into<String>,
        wizard: WizardProgress,
    ) -> Self {
        Self {
            flow: Flow::LoanVerify,
            loan_type,
            form_id: Some(form_id.into()),
            wizard: Some(wizard),
            ..Self::new()
        }
    }

    /// Record activity for idle-expiry accounting.
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// True if the session has been idle longer than `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        let idle = Utc::now().signed_duration_since(self.last_active);
        idle.num_seconds() >= ttl.as_secs() as i64
    }
}

impl Default for FlowSession {
    fn default() -> Self {
        Self::new()
    }
}
