//! Intent Classifier Port
//!
//! Boundary to the external language model used for two jobs: mapping a
//! free-text message onto the allowed intent categories, and producing a
//! short educational answer for general banking questions. The caller
//! treats every error as non-fatal and degrades to scripted copy.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::flow::ClassifiedIntent;

/// Failures while consulting the classifier backend.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier request failed: {0}")]
    Network(String),

    #[error("classifier returned status {status}")]
    Http { status: u16, body: String },

    #[error("classifier output could not be parsed: {0}")]
    Parse(String),

    #[error("no classifier credentials configured")]
    Unconfigured,
}

impl ClassifierError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    pub fn parse(err: impl std::fmt::Display) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Language-model boundary for intent resolution and general answers.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify a user message into an allowed intent category.
    async fn classify(&self, message: &str) -> Result<ClassifiedIntent, ClassifierError>;

    /// Produce a short answer to a general banking question.
    async fn general_answer(&self, message: &str) -> Result<String, ClassifierError>;
}
