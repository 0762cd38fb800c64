//! External Action Directory
//!
//! Static mapping from resolved intents to destination URLs and form
//! identifiers. Consumed, never mutated, by the router and the wizard.
//! Lookups are pure so repeated queries for the same intent always yield
//! the same destination.

use chrono::Utc;

use super::action::PaymentAccount;

/// Form identifier hosted by the external form service.
const APPLY_LOAN_FORM_ID: &str = "2000002";

/// Static directory of hand-off destinations.
///
/// Constructed once per process and shared by reference; the demo tables
/// are baked in, but the type exists so tests and future deployments can
/// inject their own.
#[derive(Debug, Clone, Default)]
pub struct ActionDirectory;

impl ActionDirectory {
    pub fn new() -> Self {
        Self
    }

    /// Secure payment portal URL for an account category.
    pub fn payment_url(&self, account: PaymentAccount) -> &'static str {
        match account {
            PaymentAccount::Mortgage => "https://payments.finovabank.example/mortgage",
            PaymentAccount::CreditCard => "https://payments.finovabank.example/credit-card",
            PaymentAccount::AutoLoan => "https://payments.finovabank.example/auto-loan",
            PaymentAccount::PersonalLoan => "https://payments.finovabank.example/personal-loan",
        }
    }

    /// Form identifier for the loan application micro-app.
    pub fn loan_application_form_id(&self) -> &'static str {
        APPLY_LOAN_FORM_ID
    }

    /// Destination shown on the completion button after a mocked approval.
    pub fn loan_completion_url(&self) -> &'static str {
        "https://apply.finovabank.example/loan/complete"
    }

    /// Build a viewer URL for launching a hosted form.
    ///
    /// Returns `None` when no org id is available, matching the behavior of
    /// an unconfigured provider. The `ts` parameter exists only to defeat
    /// viewer caching.
    pub fn form_launch_url(&self, form_id: &str, org_id: Option<&str>) -> Option<String> {
        let org_id = org_id.filter(|o| !o.is_empty())?;
        let ts = Utc::now().timestamp_millis();
        Some(format!(
            "https://studio.callvu.net/callvu-viewer/?UrlSlug={form_id}&IsGate=true&TID={org_id}&ts={ts}"
        ))
    }
}
