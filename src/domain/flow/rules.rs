//! Keyword pre-filter rules
//!
//! Ordered rule table applied to the raw message before any classifier
//! call. Kept as an enumerable list so the precedence order is testable in
//! isolation instead of being buried in inline string checks.

/// Intent produced by a matching keyword rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicIntent {
    Payment,
    LoanApplication,
}

/// One `(predicate, intent)` entry in the rule table.
pub struct KeywordRule {
    /// Rule name for diagnostics.
    pub name: &'static str,
    /// Predicate over the lowercased message.
    pub matches: fn(&str) -> bool,
    /// Intent assigned when the predicate holds.
    pub intent: HeuristicIntent,
}

/// The rule table, evaluated top to bottom; first match wins.
///
/// The loan rule requires two keywords and sits above the broader payment
/// rule so "apply for a loan to pay off my card" resolves as a loan intent.
pub const RULES: &[KeywordRule] = &[
    KeywordRule {
        name: "loan_application_keywords",
        matches: |msg| msg.contains("apply") && msg.contains("loan"),
        intent: HeuristicIntent::LoanApplication,
    },
    KeywordRule {
        name: "payment_keywords",
        matches: |msg| msg.contains("payment") || msg.contains("pay"),
        intent: HeuristicIntent::Payment,
    },
];

/// Evaluate the rule table against a message.
pub fn evaluate(message: &str) -> Option<HeuristicIntent> {
    let msg = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&msg))
        .map(|rule| rule.intent)
}
