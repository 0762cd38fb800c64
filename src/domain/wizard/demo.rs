//! Demo Field Set
//!
//! The canned loan verification questionnaire used whenever the external
//! form provider is unavailable or unconfigured. Prefill values describe a
//! fictional customer with data on file, so the demo exercises the
//! confirm-or-correct interaction the real provider would drive.

use super::field::{FieldDescriptor, InputKind, ADDRESS_BLOCK_ID};

/// The nine-field demo questionnaire, in prompt order.
pub fn demo_loan_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("firstName", "First name", InputKind::Text).with_prefill("Greg"),
        FieldDescriptor::new("lastName", "Last name", InputKind::Text).with_prefill("Wilwerding"),
        FieldDescriptor::new("email", "Email address", InputKind::Email)
            .with_prefill("greg.wilwerding@example.com"),
        FieldDescriptor::new("phone", "Phone number", InputKind::Phone)
            .with_prefill("(415) 555-0137"),
        FieldDescriptor::new("dateOfBirth", "Date of birth", InputKind::Date)
            .with_prefill("1978-04-12"),
        FieldDescriptor::new("ssnLast4", "Last 4 digits of SSN", InputKind::Ssn)
            .with_prefill("1234"),
        FieldDescriptor::new(ADDRESS_BLOCK_ID, "Home address", InputKind::Multiline)
            .with_prefill("123 Market Street\nSuite 500\nSan Francisco, CA 94105"),
        FieldDescriptor::new("annualIncome", "Annual income", InputKind::Currency)
            .with_prefill("125000"),
        FieldDescriptor::new("requestedAmount", "Requested loan amount", InputKind::Currency)
            .with_prefill("25000"),
    ]
}
