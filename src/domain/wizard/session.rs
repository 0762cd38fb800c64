//! Wizard Session Entity
//!
//! One in-flight field-collection run: the normalized field list, the
//! answers recorded so far, and a cursor over the next field to ask.
//! Answers are accepted strictly in order; an answer for any field other
//! than the current one is rejected so the client and server can never
//! silently disagree about progress.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::field::FieldDescriptor;

/// Errors raised while advancing a wizard session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("no active wizard session with id {0}")]
    UnknownSession(String),

    #[error("answer targets field {got} but the current field is {expected}")]
    FieldMismatch { expected: String, got: String },

    #[error("wizard session {0} already collected every field")]
    AlreadyComplete(String),

    #[error("a wizard session needs at least one field")]
    NoFields,
}

/// A recorded answer for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAnswer {
    pub field_id: String,
    pub value: String,
}

/// One field-collection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardSession {
    /// Opaque id the client echoes back with every answer.
    pub id: String,
    /// Form the answers belong to.
    pub form_id: String,
    /// Normalized fields, in prompt order.
    pub fields: Vec<FieldDescriptor>,
    /// Answers recorded so far, in field order.
    pub answers: Vec<FieldAnswer>,
}

impl WizardSession {
    /// Start a run over a non-empty, already normalized field list.
    pub fn start(form_id: impl Into<String>, fields: Vec<FieldDescriptor>) -> Result<Self, WizardError> {
        if fields.is_empty() {
            return Err(WizardError::NoFields);
        }
        Ok(Self {
            id: new_wizard_id(),
            form_id: form_id.into(),
            fields,
            answers: Vec::new(),
        })
    }

    /// The field currently being asked, or `None` once complete.
    pub fn current_field(&self) -> Option<&FieldDescriptor> {
        self.fields.get(self.answers.len())
    }

    /// 1-based number of the current step, clamped to the last step once
    /// the run completes.
    pub fn step_number(&self) -> usize {
        (self.answers.len() + 1).min(self.fields.len())
    }

    pub fn total_steps(&self) -> usize {
        self.fields.len()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() >= self.fields.len()
    }

    /// Record the answer for the current field and advance the cursor.
    ///
    /// The `field_id` must name the current field; out-of-order answers are
    /// rejected without mutating the session.
    pub fn record_answer(
        &mut self,
        field_id: &str,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        let current = self
            .current_field()
            .ok_or_else(|| WizardError::AlreadyComplete(self.id.clone()))?;
        if current.id != field_id {
            return Err(WizardError::FieldMismatch {
                expected: current.id.clone(),
                got: field_id.to_string(),
            });
        }
        self.answers.push(FieldAnswer {
            field_id: field_id.to_string(),
            value: value.into(),
        });
        Ok(())
    }
}

/// Generate a wizard session id: millisecond timestamp plus a short
/// random suffix, unique enough for an in-memory demo store.
fn new_wizard_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("wiz-{millis}-{}", &suffix[..8])
}
