//! Wizard Engine
//!
//! Drives field-collection runs: starts a run from a fetched form
//! definition (falling back to the demo questionnaire when the provider
//! is unavailable), accepts answers in order, and reports when a run is
//! complete. Runs hold collected personal data, so abandoned ones are
//! discarded explicitly by the caller and swept by an idle TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::ports::form_provider::{FormProvider, FormProviderError};

use super::demo::demo_loan_fields;
use super::field::{normalize_fields, FieldDescriptor};
use super::session::{FieldAnswer, WizardError, WizardSession};

/// A point-in-time view of a run, enough to prompt for the current field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSnapshot {
    pub wizard_session_id: String,
    pub step_number: usize,
    pub total_steps: usize,
    pub field: FieldDescriptor,
}

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// More fields remain; prompt for the next one.
    NextField(WizardSnapshot),
    /// Every field is collected; the run has been closed out.
    Complete {
        form_id: String,
        answers: Vec<FieldAnswer>,
    },
}

const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct Run {
    session: WizardSession,
    touched: Instant,
}

/// In-memory engine over all active runs.
pub struct WizardEngine {
    provider: Arc<dyn FormProvider>,
    runs: Mutex<HashMap<String, Run>>,
    idle_ttl: Duration,
}

impl WizardEngine {
    pub fn new(provider: Arc<dyn FormProvider>) -> Self {
        Self::with_idle_ttl(provider, DEFAULT_IDLE_TTL)
    }

    pub fn with_idle_ttl(provider: Arc<dyn FormProvider>, idle_ttl: Duration) -> Self {
        Self {
            provider,
            runs: Mutex::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Start a run for a form.
    ///
    /// Provider unavailability (unconfigured, transport failure, 5xx, or
    /// an unusable field list) activates the demo questionnaire. Client
    /// errors from the provider propagate unchanged.
    pub async fn start(&self, form_id: &str) -> Result<WizardSnapshot, FormProviderError> {
        let fields = match self.provider.fetch_form(form_id).await {
            Ok(detail) => {
                let normalized = normalize_fields(detail.fields);
                if normalized.is_empty() {
                    debug!(form_id, "form has no usable fields, using demo set");
                    demo_loan_fields()
                } else {
                    normalized
                }
            }
            Err(err) if err.is_fallback_eligible() => {
                warn!(form_id, error = %err, "form provider unavailable, using demo set");
                demo_loan_fields()
            }
            Err(err) => return Err(err),
        };

        // The demo set is never empty, so NoFields cannot occur here.
        let session = WizardSession::start(form_id, fields)
            .map_err(|err| FormProviderError::parse(err.to_string()))?;
        let snapshot = snapshot_of(&session)
            .ok_or_else(|| FormProviderError::parse("wizard started with no current field"))?;

        let mut runs = self.runs.lock().await;
        sweep_idle(&mut runs, self.idle_ttl);
        runs.insert(
            session.id.clone(),
            Run {
                session,
                touched: Instant::now(),
            },
        );
        Ok(snapshot)
    }

    /// Record the answer for the current field of a run.
    pub async fn submit(
        &self,
        wizard_session_id: &str,
        field_id: &str,
        value: &str,
    ) -> Result<SubmitOutcome, WizardError> {
        let mut runs = self.runs.lock().await;
        sweep_idle(&mut runs, self.idle_ttl);
        let run = runs
            .get_mut(wizard_session_id)
            .ok_or_else(|| WizardError::UnknownSession(wizard_session_id.to_string()))?;

        run.session.record_answer(field_id, value)?;
        run.touched = Instant::now();

        if let Some(snapshot) = snapshot_of(&run.session) {
            return Ok(SubmitOutcome::NextField(snapshot));
        }

        // Completed runs are dropped; answers go to the caller.
        let finished = runs
            .remove(wizard_session_id)
            .ok_or_else(|| WizardError::UnknownSession(wizard_session_id.to_string()))?;
        Ok(SubmitOutcome::Complete {
            form_id: finished.session.form_id,
            answers: finished.session.answers,
        })
    }

    /// Re-read the current field of a run.
    pub async fn current(&self, wizard_session_id: &str) -> Result<WizardSnapshot, WizardError> {
        let mut runs = self.runs.lock().await;
        sweep_idle(&mut runs, self.idle_ttl);
        let run = runs
            .get_mut(wizard_session_id)
            .ok_or_else(|| WizardError::UnknownSession(wizard_session_id.to_string()))?;
        run.touched = Instant::now();
        snapshot_of(&run.session)
            .ok_or_else(|| WizardError::AlreadyComplete(wizard_session_id.to_string()))
    }

    /// Drop an abandoned run and everything it collected.
    pub async fn discard(&self, wizard_session_id: &str) {
        self.runs.lock().await.remove(wizard_session_id);
    }
}

fn sweep_idle(runs: &mut HashMap<String, Run>, idle_ttl: Duration) {
    runs.retain(|_, run| run.touched.elapsed() < idle_ttl);
}

fn snapshot_of(session: &WizardSession) -> Option<WizardSnapshot> {
    session.current_field().map(|field| WizardSnapshot {
        wizard_session_id: session.id.clone(),
        step_number: session.step_number(),
        total_steps: session.total_steps(),
        field: field.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::form_provider::FormDetail;
    use async_trait::async_trait;

    struct StaticProvider {
        result: fn() -> Result<FormDetail, FormProviderError>,
    }

    #[async_trait]
    impl FormProvider for StaticProvider {
        async fn fetch_form(&self, _form_id: &str) -> Result<FormDetail, FormProviderError> {
            (self.result)()
        }

        async fn launch_form(
            &self,
            _form_id: &str,
            _answers: &[FieldAnswer],
        ) -> Result<String, FormProviderError> {
            Err(FormProviderError::Unconfigured)
        }
    }

    fn engine_with(result: fn() -> Result<FormDetail, FormProviderError>) -> WizardEngine {
        WizardEngine::new(Arc::new(StaticProvider { result }))
    }

    #[tokio::test]
    async fn unconfigured_provider_falls_back_to_demo_fields() {
        let engine = engine_with(|| Err(FormProviderError::Unconfigured));
        let snapshot = engine.start("2000002").await.unwrap();
        assert_eq!(snapshot.total_steps, 9);
        assert_eq!(snapshot.step_number, 1);
        assert_eq!(snapshot.field.id, "firstName");
        assert_eq!(snapshot.field.prefill.as_deref(), Some("Greg"));
    }

    #[tokio::test]
    async fn server_error_falls_back_but_client_error_propagates() {
        let engine = engine_with(|| {
            Err(FormProviderError::Http {
                status: 502,
                body: String::new(),
            })
        });
        assert!(engine.start("2000002").await.is_ok());

        let engine = engine_with(|| {
            Err(FormProviderError::Http {
                status: 404,
                body: "no such form".to_string(),
            })
        });
        let err = engine.start("2000002").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn empty_field_list_falls_back_to_demo_fields() {
        let engine = engine_with(|| {
            Ok(FormDetail {
                form_id: "2000002".to_string(),
                name: None,
                fields: vec![],
            })
        });
        let snapshot = engine.start("2000002").await.unwrap();
        assert_eq!(snapshot.total_steps, 9);
    }

    #[tokio::test]
    async fn full_run_completes_with_all_answers() {
        let engine = engine_with(|| Err(FormProviderError::Unconfigured));
        let mut snapshot = engine.start("2000002").await.unwrap();
        let id = snapshot.wizard_session_id.clone();

        loop {
            let outcome = engine
                .submit(&id, &snapshot.field.id, "answer")
                .await
                .unwrap();
            match outcome {
                SubmitOutcome::NextField(next) => {
                    assert_eq!(next.step_number, snapshot.step_number + 1);
                    snapshot = next;
                }
                SubmitOutcome::Complete { form_id, answers } => {
                    assert_eq!(form_id, "2000002");
                    assert_eq!(answers.len(), 9);
                    break;
                }
            }
        }

        // The run is gone once complete.
        assert!(matches!(
            engine.current(&id).await,
            Err(WizardError::UnknownSession(_))
        ));
    }

    #[tokio::test]
    async fn wrong_field_answer_leaves_run_unchanged() {
        let engine = engine_with(|| Err(FormProviderError::Unconfigured));
        let snapshot = engine.start("2000002").await.unwrap();
        let id = snapshot.wizard_session_id.clone();

        let err = engine.submit(&id, "lastName", "x").await.unwrap_err();
        assert!(matches!(err, WizardError::FieldMismatch { .. }));

        let current = engine.current(&id).await.unwrap();
        assert_eq!(current.field.id, "firstName");
        assert_eq!(current.step_number, 1);
    }

    #[tokio::test]
    async fn discarded_run_is_gone() {
        let engine = engine_with(|| Err(FormProviderError::Unconfigured));
        let snapshot = engine.start("2000002").await.unwrap();
        let id = snapshot.wizard_session_id;

        engine.discard(&id).await;
        assert!(matches!(
            engine.current(&id).await,
            Err(WizardError::UnknownSession(_))
        ));
    }

    #[tokio::test]
    async fn idle_runs_are_swept() {
        let engine = WizardEngine::with_idle_ttl(
            Arc::new(StaticProvider {
                result: || Err(FormProviderError::Unconfigured),
            }),
            Duration::ZERO,
        );
        let snapshot = engine.start("2000002").await.unwrap();

        assert!(matches!(
            engine.current(&snapshot.wizard_session_id).await,
            Err(WizardError::UnknownSession(_))
        ));
    }

    #[tokio::test]
    async fn unknown_session_is_rejected() {
        let engine = engine_with(|| Err(FormProviderError::Unconfigured));
        assert!(matches!(
            engine.submit("wiz-missing", "firstName", "x").await,
            Err(WizardError::UnknownSession(_))
        ));
    }
}
