//! Action Identifiers
//!
//! Parsed form of the `actionIntent` strings sent when a user clicks a
//! button in the chat widget. The wire strings are a stable contract with
//! the client; keep them in sync with the button tables in the router.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recognized button action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionIntent {
    /// User picked which account to pay on.
    PaymentType(PaymentAccount),
    /// User picked which loan product to apply for.
    LoanType(LoanProduct),
    /// User confirmed starting the loan application handoff.
    BeginLoanApplication,
}

impl ActionIntent {
    /// Parse an action identifier from its wire string.
    ///
    /// Returns `None` for unknown identifiers; the router then falls
    /// through to text-based handling.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PAYMENT_TYPE_MORTGAGE" => Some(Self::PaymentType(PaymentAccount::Mortgage)),
            "PAYMENT_TYPE_CREDIT_CARD" => Some(Self::PaymentType(PaymentAccount::CreditCard)),
            "PAYMENT_TYPE_AUTO_LOAN" => Some(Self::PaymentType(PaymentAccount::AutoLoan)),
            "PAYMENT_TYPE_PERSONAL_LOAN" => Some(Self::PaymentType(PaymentAccount::PersonalLoan)),
            "LOAN_TYPE_PERSONAL" => Some(Self::LoanType(LoanProduct::Personal)),
            "LOAN_TYPE_AUTO" => Some(Self::LoanType(LoanProduct::Auto)),
            "LOAN_TYPE_HOME" => Some(Self::LoanType(LoanProduct::Home)),
            "LOAN_TYPE_OTHER" => Some(Self::LoanType(LoanProduct::Other)),
            "BEGIN_LOAN_APPLICATION" => Some(Self::BeginLoanApplication),
            _ => None,
        }
    }

    /// The wire string for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentType(PaymentAccount::Mortgage) => "PAYMENT_TYPE_MORTGAGE",
            Self::PaymentType(PaymentAccount::CreditCard) => "PAYMENT_TYPE_CREDIT_CARD",
            Self::PaymentType(PaymentAccount::AutoLoan) => "PAYMENT_TYPE_AUTO_LOAN",
            Self::PaymentType(PaymentAccount::PersonalLoan) => "PAYMENT_TYPE_PERSONAL_LOAN",
            Self::LoanType(LoanProduct::Personal) => "LOAN_TYPE_PERSONAL",
            Self::LoanType(LoanProduct::Auto) => "LOAN_TYPE_AUTO",
            Self::LoanType(LoanProduct::Home) => "LOAN_TYPE_HOME",
            Self::LoanType(LoanProduct::Other) => "LOAN_TYPE_OTHER",
            Self::BeginLoanApplication => "BEGIN_LOAN_APPLICATION",
        }
    }
}

/// Account categories offered on the payment button row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentAccount {
    Mortgage,
    CreditCard,
    AutoLoan,
    PersonalLoan,
}

impl PaymentAccount {
    /// All accounts in button display order.
    pub const ALL: [PaymentAccount; 4] = [
        PaymentAccount::Mortgage,
        PaymentAccount::CreditCard,
        PaymentAccount::AutoLoan,
        PaymentAccount::PersonalLoan,
    ];

    /// Button label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mortgage => "Mortgage",
            Self::CreditCard => "Credit Card",
            Self::AutoLoan => "Auto Loan",
            Self::PersonalLoan => "Personal Loan",
        }
    }

    /// The action identifier that selects this account.
    pub fn action(&self) -> ActionIntent {
        ActionIntent::PaymentType(*self)
    }
}

/// Loan products offered on the loan-type button row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanProduct {
    Personal,
    Auto,
    Home,
    Other,
}

impl LoanProduct {
    /// All products in button display order.
    pub const ALL: [LoanProduct; 4] = [
        LoanProduct::Personal,
        LoanProduct::Auto,
        LoanProduct::Home,
        LoanProduct::Other,
    ];

    /// Button label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Personal => "Personal Loan",
            Self::Auto => "Auto Loan",
            Self::Home => "Home Loan",
            Self::Other => "Other",
        }
    }

    /// The action identifier that selects this product.
    pub fn action(&self) -> ActionIntent {
        ActionIntent::LoanType(*self)
    }

    /// Match a free-text loan type (e.g. from the classifier) to a product.
    ///
    /// Comparison is case-insensitive against both the display label and the
    /// short form ("personal", "auto loan", ...).
    pub fn from_text(text: &str) -> Option<Self> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() || needle == "null" {
            return None;
        }
        Self::ALL.into_iter().find(|p| {
            let label = p.label().to_lowercase();
            label == needle || label.trim_end_matches(" loan") == needle
        })
    }
}

impl fmt::Display for LoanProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
