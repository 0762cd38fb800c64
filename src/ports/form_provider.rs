//! Form Provider Port
//!
//! Boundary to the external form service hosting the loan micro-apps.
//! Two operations: fetch the field list of a form, and launch the hosted
//! form with the collected answers. Availability failures are
//! distinguished from caller mistakes so the wizard can fall back to its
//! demo fields only when the provider itself is at fault.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::wizard::{FieldAnswer, FieldDescriptor};

/// Failures while talking to the form provider.
#[derive(Debug, Error)]
pub enum FormProviderError {
    #[error("no form provider credentials configured")]
    Unconfigured,

    #[error("form provider unreachable: {0}")]
    Transport(String),

    #[error("form provider returned status {status}")]
    Http { status: u16, body: String },

    #[error("form provider response could not be parsed: {0}")]
    Parse(String),
}

impl FormProviderError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn parse(err: impl std::fmt::Display) -> Self {
        Self::Parse(err.to_string())
    }

    /// HTTP status carried by the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure reflects provider unavailability rather than a
    /// caller mistake. Unavailability activates the demo fallback; 4xx
    /// responses propagate.
    pub fn is_fallback_eligible(&self) -> bool {
        match self {
            Self::Unconfigured | Self::Transport(_) | Self::Parse(_) => true,
            Self::Http { status, .. } => *status == 0 || *status >= 500,
        }
    }
}

/// A fetched form definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDetail {
    pub form_id: String,
    pub name: Option<String>,
    /// Raw fields as the provider described them, not yet normalized.
    pub fields: Vec<FieldDescriptor>,
}

/// External form service boundary.
#[async_trait]
pub trait FormProvider: Send + Sync {
    /// Fetch the field definitions of a hosted form.
    async fn fetch_form(&self, form_id: &str) -> Result<FormDetail, FormProviderError>;

    /// Launch the hosted form with the collected answers, returning the
    /// viewer URL the service hands back.
    async fn launch_form(
        &self,
        form_id: &str,
        answers: &[FieldAnswer],
    ) -> Result<String, FormProviderError>;
}
