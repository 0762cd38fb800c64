//! Turn Response Types
//!
//! Every branch of the router produces the same tagged response value
//! instead of ad-hoc object shapes: a reply, a resolved intent, and one
//! payload variant describing what the client should render next.

use serde::{Deserialize, Serialize};

/// The final, validated category assigned to a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvedIntent {
    Payment,
    LoanApplication,
    General,
    OutOfScope,
}

impl ResolvedIntent {
    /// Wire string used in the `intent` response field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "PAYMENT",
            Self::LoanApplication => "LOAN_APPLICATION",
            Self::General => "GENERAL_BANKING_QUESTION",
            Self::OutOfScope => "OUT_OF_SCOPE",
        }
    }
}

/// A button that posts an action identifier back to the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub label: String,
    pub action_intent: String,
}

impl ActionButton {
    pub fn new(label: impl Into<String>, action_intent: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action_intent: action_intent.into(),
        }
    }
}

/// A button that opens an external hand-off URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
    pub open_in_new_window: bool,
}

impl LinkButton {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            open_in_new_window: true,
        }
    }
}

/// Request for the next wizard field, rendered inline by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPrompt {
    /// Wizard session the answer must be posted back to.
    pub session_id: String,
    /// Field being collected.
    pub field_id: String,
    /// Input widget hint (text, date, ssn, currency, ...).
    pub input_type: String,
    /// 1-based progress counter; never exceeds `total_steps`.
    pub step_number: usize,
    pub total_steps: usize,
    /// Value pre-populated in the input box.
    pub prefill_value: Option<String>,
    /// Human label for the field.
    pub label: String,
}

/// Simulated eligibility-check directive shown after the final answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingDirective {
    /// How long the client should animate before revealing the result.
    pub duration_ms: u64,
    /// Approval copy; mentions the selected loan product.
    pub approval_message: String,
    /// Follow-up copy shown under the approval.
    pub completion_message: String,
    /// Hand-off button to finish the application externally.
    pub completion_button: LinkButton,
}

/// What the client should render alongside the reply text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePayload {
    /// Plain reply, nothing interactive.
    None,
    /// A row of action buttons.
    Buttons(Vec<ActionButton>),
    /// A single external link button.
    Link(LinkButton),
    /// An inline wizard input request.
    Input(InputPrompt),
    /// The mocked eligibility-check sequence.
    Loading(LoadingDirective),
}

/// The complete output of one chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResponse {
    pub reply: String,
    pub intent: ResolvedIntent,
    pub payload: ResponsePayload,
}

impl TurnResponse {
    pub fn reply(intent: ResolvedIntent, reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            intent,
            payload: ResponsePayload::None,
        }
    }

    pub fn with_buttons(
        intent: ResolvedIntent,
        reply: impl Into<String>,
        buttons: Vec<ActionButton>,
    ) -> Self {
        Self {
            reply: reply.into(),
            intent,
            payload: ResponsePayload::Buttons(buttons),
        }
    }

    pub fn with_link(intent: ResolvedIntent, reply: impl Into<String>, link: LinkButton) -> Self {
        Self {
            reply: reply.into(),
            intent,
            payload: ResponsePayload::Link(link),
        }
    }

    pub fn with_input(
        intent: ResolvedIntent,
        reply: impl Into<String>,
        input: InputPrompt,
    ) -> Self {
        Self {
            reply: reply.into(),
            intent,
            payload: ResponsePayload::Input(input),
        }
    }

    pub fn with_loading(
        intent: ResolvedIntent,
        reply: impl Into<String>,
        loading: LoadingDirective,
    ) -> Self {
        Self {
            reply: reply.into(),
            intent,
            payload: ResponsePayload::Loading(loading),
        }
    }
}
