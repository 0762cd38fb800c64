//! Field-collection wizard: sessions, field normalization, and the engine.

pub mod demo;
pub mod engine;
pub mod field;
pub mod session;

pub use demo::demo_loan_fields;
pub use engine::{SubmitOutcome, WizardEngine, WizardSnapshot};
pub use field::{normalize_fields, FieldDescriptor, InputKind};
pub use session::{FieldAnswer, WizardError, WizardSession};
