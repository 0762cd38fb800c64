//! Chat Turn Handler - Orchestrates one message through the flow router.
//!
//! Owns everything the pure router cannot: session storage, the wizard
//! engine, classifier calls, and the fire-and-forget form launch. Each
//! session key is single-flighted so concurrent turns cannot race flow
//! state. Classifier failures are absorbed into scripted copy; only
//! caller mistakes and unrecoverable provider errors surface as errors.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::flow::{
    ActionIntent, Flow, FlowRouter, FlowSession, InputPrompt, LoanProduct, ResolvedIntent,
    RouterDecision, SessionUpdate, TurnInput, TurnResponse, WizardAnswer, WizardProgress,
};
use crate::domain::wizard::{FieldAnswer, SubmitOutcome, WizardEngine, WizardError, WizardSnapshot};
use crate::ports::{FormProvider, IntentClassifier, SessionStore};

use super::keyed_locks::KeyedLocks;

const EMPTY_MESSAGE_REPLY: &str = "Please provide a message to send.";
const WIZARD_INTRO_REPLY: &str =
    "Let's verify the information we have on file. Please confirm each item or correct anything that's changed.";
const WIZARD_NEXT_REPLY: &str = "Thanks, got it.";
const WIZARD_RESUME_REPLY: &str = "Let's pick up where we left off.";
const WIZARD_DONE_REPLY: &str =
    "That's everything I need. Give me a moment while I check your eligibility.";

/// Failures surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum ChatTurnError {
    /// The request itself was malformed; maps to a 400.
    #[error("{0}")]
    Validation(String),

    /// An upstream dependency failed in a way we do not paper over.
    #[error("upstream failure: {0}")]
    Upstream(String),
}

/// One chat turn as received from the transport layer.
#[derive(Debug, Clone, Default)]
pub struct TurnRequest {
    pub message: String,
    /// Raw action identifier from a clicked button.
    pub action_intent: Option<String>,
    /// Wizard session and field the message answers.
    pub wizard_session_id: Option<String>,
    pub field_id: Option<String>,
}

/// Orchestrator for the conversational endpoint.
pub struct ChatTurnHandler {
    router: FlowRouter,
    sessions: Arc<dyn SessionStore>,
    classifier: Arc<dyn IntentClassifier>,
    wizard: Arc<WizardEngine>,
    forms: Arc<dyn FormProvider>,
    locks: KeyedLocks,
}

impl ChatTurnHandler {
    pub fn new(
        router: FlowRouter,
        sessions: Arc<dyn SessionStore>,
        classifier: Arc<dyn IntentClassifier>,
        wizard: Arc<WizardEngine>,
        forms: Arc<dyn FormProvider>,
    ) -> Self {
        Self {
            router,
            sessions,
            classifier,
            wizard,
            forms,
            locks: KeyedLocks::new(),
        }
    }

    /// Handle one turn for a session key.
    pub async fn handle(
        &self,
        session_key: &str,
        request: TurnRequest,
    ) -> Result<TurnResponse, ChatTurnError> {
        let message = request.message.trim().to_string();
        if message.is_empty() {
            return Err(ChatTurnError::Validation(EMPTY_MESSAGE_REPLY.to_string()));
        }

        let input = build_input(message, &request);

        let _guard = self.locks.acquire(session_key).await;
        let session = self.sessions.get(session_key).await;

        let mut decision = self.router.route(&session, &input);
        loop {
            match decision {
                RouterDecision::Respond { response, update } => {
                    self.apply_update(session_key, &session, update).await;
                    return Ok(response);
                }
                RouterDecision::StartWizard { loan_type, form_id } => {
                    return self
                        .start_wizard(session_key, loan_type, form_id)
                        .await;
                }
                RouterDecision::SubmitAnswer {
                    wizard_session_id,
                    field_id,
                    value,
                } => {
                    return self
                        .submit_answer(session_key, &session, &wizard_session_id, &field_id, &value)
                        .await;
                }
                RouterDecision::ResumeWizard { wizard_session_id } => {
                    return self.resume_wizard(session_key, &wizard_session_id).await;
                }
                RouterDecision::Classify => {
                    decision = match self.classifier.classify(&input.message).await {
                        Ok(result) => {
                            debug!(category = ?result.category, "message classified");
                            self.router.route_classified(&session, &result)
                        }
                        Err(err) => {
                            warn!(error = %err, "classifier unavailable, using fallback copy");
                            RouterDecision::Respond {
                                response: self.router.fallback_response(),
                                update: SessionUpdate::Keep,
                            }
                        }
                    };
                }
                RouterDecision::AnswerGeneral => {
                    let response = match self.classifier.general_answer(&input.message).await {
                        Ok(answer) => self.router.general_response(answer),
                        Err(err) => {
                            warn!(error = %err, "general answer unavailable, using fallback copy");
                            self.router.fallback_response()
                        }
                    };
                    return Ok(response);
                }
            }
        }
    }

    async fn start_wizard(
        &self,
        session_key: &str,
        loan_type: Option<LoanProduct>,
        form_id: String,
    ) -> Result<TurnResponse, ChatTurnError> {
        let snapshot = self
            .wizard
            .start(&form_id)
            .await
            .map_err(|err| ChatTurnError::Upstream(err.to_string()))?;

        info!(
            form_id,
            wizard_session_id = %snapshot.wizard_session_id,
            total_steps = snapshot.total_steps,
            "loan verification started"
        );

        let progress = progress_of(&snapshot);
        self.sessions
            .set(
                session_key,
                FlowSession::in_loan_verification(loan_type, form_id, progress),
            )
            .await;

        Ok(TurnResponse::with_input(
            ResolvedIntent::LoanApplication,
            WIZARD_INTRO_REPLY,
            prompt_of(snapshot),
        ))
    }

    async fn submit_answer(
        &self,
        session_key: &str,
        session: &FlowSession,
        wizard_session_id: &str,
        field_id: &str,
        value: &str,
    ) -> Result<TurnResponse, ChatTurnError> {
        match self.wizard.submit(wizard_session_id, field_id, value).await {
            Ok(SubmitOutcome::NextField(snapshot)) => {
                let mut updated = session.clone();
                updated.wizard = Some(progress_of(&snapshot));
                self.sessions.set(session_key, updated).await;

                Ok(TurnResponse::with_input(
                    ResolvedIntent::LoanApplication,
                    WIZARD_NEXT_REPLY,
                    prompt_of(snapshot),
                ))
            }
            Ok(SubmitOutcome::Complete { form_id, answers }) => {
                info!(
                    form_id,
                    answer_count = answers.len(),
                    "loan verification complete"
                );
                let directive = self.router.loading_directive(session.loan_type);
                self.sessions.delete(session_key).await;

                // The hosted viewer launch is best-effort and must not
                // delay the eligibility response.
                self.spawn_launch(form_id, answers);

                Ok(TurnResponse::with_loading(
                    ResolvedIntent::LoanApplication,
                    WIZARD_DONE_REPLY,
                    directive,
                ))
            }
            Err(err @ WizardError::FieldMismatch { .. }) => {
                Err(ChatTurnError::Validation(err.to_string()))
            }
            Err(err) => {
                // The run vanished out from under the session; reset.
                warn!(error = %err, "wizard run lost, clearing flow state");
                self.sessions.delete(session_key).await;
                Ok(self.router.fallback_response())
            }
        }
    }

    async fn resume_wizard(
        &self,
        session_key: &str,
        wizard_session_id: &str,
    ) -> Result<TurnResponse, ChatTurnError> {
        match self.wizard.current(wizard_session_id).await {
            Ok(snapshot) => Ok(TurnResponse::with_input(
                ResolvedIntent::LoanApplication,
                WIZARD_RESUME_REPLY,
                prompt_of(snapshot),
            )),
            Err(err) => {
                warn!(error = %err, "wizard run lost, clearing flow state");
                self.sessions.delete(session_key).await;
                Ok(self.router.fallback_response())
            }
        }
    }

    async fn apply_update(&self, session_key: &str, current: &FlowSession, update: SessionUpdate) {
        match update {
            SessionUpdate::Keep => {
                // Refresh idle expiry for sessions that actually hold state.
                if current.flow != Flow::None {
                    self.sessions.set(session_key, current.clone()).await;
                }
            }
            SessionUpdate::Store(session) => {
                self.discard_abandoned_run(current, Some(&session)).await;
                self.sessions.set(session_key, session).await;
            }
            SessionUpdate::Clear => {
                self.discard_abandoned_run(current, None).await;
                self.sessions.delete(session_key).await;
            }
        }
    }

    /// Drop the wizard run a session was tracking when the turn moves it
    /// elsewhere, so abandoned runs do not retain collected answers.
    async fn discard_abandoned_run(&self, current: &FlowSession, next: Option<&FlowSession>) {
        let Some(progress) = &current.wizard else {
            return;
        };
        let still_tracked = next
            .and_then(|session| session.wizard.as_ref())
            .is_some_and(|w| w.wizard_session_id == progress.wizard_session_id);
        if !still_tracked {
            debug!(
                wizard_session_id = %progress.wizard_session_id,
                "discarding abandoned wizard run"
            );
            self.wizard.discard(&progress.wizard_session_id).await;
        }
    }

    fn spawn_launch(&self, form_id: String, answers: Vec<FieldAnswer>) {
        let forms = Arc::clone(&self.forms);
        tokio::spawn(async move {
            match forms.launch_form(&form_id, &answers).await {
                Ok(url) => debug!(form_id, url, "form viewer launch url ready"),
                Err(err) => warn!(form_id, error = %err, "form viewer launch failed"),
            }
        });
    }
}

fn build_input(message: String, request: &TurnRequest) -> TurnInput {
    let mut input = TurnInput::message(message);
    if let Some(action) = request
        .action_intent
        .as_deref()
        .and_then(ActionIntent::parse)
    {
        input = input.with_action(action);
    }
    if let (Some(wizard_session_id), Some(field_id)) =
        (request.wizard_session_id.clone(), request.field_id.clone())
    {
        input = input.with_wizard_answer(WizardAnswer {
            wizard_session_id,
            field_id,
        });
    }
    input
}

fn progress_of(snapshot: &WizardSnapshot) -> WizardProgress {
    WizardProgress {
        wizard_session_id: snapshot.wizard_session_id.clone(),
        step_number: snapshot.step_number,
        total_steps: snapshot.total_steps,
    }
}

fn prompt_of(snapshot: WizardSnapshot) -> InputPrompt {
    InputPrompt {
        session_id: snapshot.wizard_session_id,
        field_id: snapshot.field.id,
        input_type: snapshot.field.input_kind.as_str().to_string(),
        step_number: snapshot.step_number,
        total_steps: snapshot.total_steps,
        prefill_value: snapshot.field.prefill,
        label: snapshot.field.label,
    }
}
