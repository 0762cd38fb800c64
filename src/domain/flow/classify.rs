//! Classifier Output Contract
//!
//! The validated shape of what the external intent classifier may return.
//! Adapters parse raw model output into these types; anything outside the
//! allowed category set degrades to `General`.

use serde::{Deserialize, Serialize};

/// Coarse intent categories the classifier is allowed to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    LoanApplication,
    Payment,
    General,
    OutOfScope,
}

impl IntentCategory {
    /// Parse the classifier's snake_case category string.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "loan_application" => Some(Self::LoanApplication),
            "payment" => Some(Self::Payment),
            "general" => Some(Self::General),
            "out_of_scope" => Some(Self::OutOfScope),
            _ => None,
        }
    }
}

/// Validated classifier result for one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedIntent {
    pub category: IntentCategory,
    /// Free-text loan type when the user named one ("auto loan", ...).
    pub loan_type: Option<String>,
}

impl ClassifiedIntent {
    pub fn new(category: IntentCategory, loan_type: Option<String>) -> Self {
        Self {
            category,
            loan_type,
        }
    }

    /// The safe default used whenever the classifier is unusable.
    pub fn general() -> Self {
        Self {
            category: IntentCategory::General,
            loan_type: None,
        }
    }
}
