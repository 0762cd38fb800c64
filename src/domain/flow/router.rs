//! Flow Router
//!
//! The multi-turn state machine at the heart of the assistant. Given the
//! current session and the incoming turn it produces a [`RouterDecision`]:
//! either a finished response plus a session update, or a command naming
//! the side-effecting call the application layer must issue (start the
//! wizard, submit a wizard answer, consult the classifier). The router
//! itself never performs I/O, so every `(state, action)` transition is
//! deterministic and testable in isolation.
//!
//! Signal priority within one turn:
//! 1. an answer scoped to the active wizard session
//! 2. any recognized action identifier, current-state or stale
//! 3. keyword heuristics on the raw text (also mid-flow: a topic switch
//!    abandons the old flow)
//! 4. a re-prompt when a flow is active but nothing matched
//! 5. the intent classifier
//! 6. the scripted fallback, chosen by the application layer when the
//!    classifier is unusable

use super::action::{ActionIntent, LoanProduct, PaymentAccount};
use super::classify::{ClassifiedIntent, IntentCategory};
use super::directory::ActionDirectory;
use super::response::{
    ActionButton, LinkButton, LoadingDirective, ResolvedIntent, TurnResponse,
};
use super::rules::{self, HeuristicIntent};
use super::session::{Flow, FlowSession};

/// Fixed assistant copy. Wording is part of the demo script, not logic.
pub const PAYMENT_PROMPT: &str = "Which account would you like to make a payment on?";
pub const PAYMENT_LINK_REPLY: &str =
    "Great, click the link below to make your payment in our secure payment portal.";
pub const LOAN_TYPE_PROMPT: &str = "What type of loan are you interested in?";
pub const LOAN_BEGIN_MESSAGE: &str = "I can help you start your application. For your security, I'll hand this step off to our secure application system to collect your personal information.\n\nTo make this easier, we'll prefill the information we have on file for you. Please verify the information and update anything that's incorrect.";
pub const OUT_OF_SCOPE_REPLY: &str =
    "I can only help with banking-related questions like payments or loan applications.";
pub const FALLBACK_REPLY: &str =
    "I can help with payments, loan applications, or general banking questions. How can I help?";
pub const COMPLETION_MESSAGE: &str =
    "Click below to review and finish your application in our secure portal.";

/// How long the client animates the mocked eligibility check.
const ELIGIBILITY_CHECK_MS: u64 = 5000;

/// Wizard-scoped input accompanying a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardAnswer {
    pub wizard_session_id: String,
    pub field_id: String,
}

/// One incoming chat turn, already validated as non-empty.
#[derive(Debug, Clone)]
pub struct TurnInput {
    pub message: String,
    pub action: Option<ActionIntent>,
    pub wizard_answer: Option<WizardAnswer>,
}

impl TurnInput {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action: None,
            wizard_answer: None,
        }
    }

    pub fn with_action(mut self, action: ActionIntent) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_wizard_answer(mut self, answer: WizardAnswer) -> Self {
        self.wizard_answer = Some(answer);
        self
    }
}

/// How the session store should change after the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Leave the stored session as it is.
    Keep,
    /// Replace the stored session.
    Store(FlowSession),
    /// Delete the stored session (flow finished or abandoned).
    Clear,
}

/// The router's verdict for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterDecision {
    /// A complete response; apply the update and return it.
    Respond {
        response: TurnResponse,
        update: SessionUpdate,
    },
    /// Enter loan verification: fetch the form and ask the first field.
    StartWizard {
        loan_type: Option<LoanProduct>,
        form_id: String,
    },
    /// Forward the message as the answer to the expected wizard field.
    SubmitAnswer {
        wizard_session_id: String,
        field_id: String,
        value: String,
    },
    /// Re-issue the current wizard field prompt.
    ResumeWizard { wizard_session_id: String },
    /// No deterministic signal matched; consult the intent classifier.
    Classify,
    /// Classifier resolved `general`; produce an educational answer.
    AnswerGeneral,
}

/// Pure decision logic for the conversational flows.
#[derive(Debug, Clone)]
pub struct FlowRouter {
    directory: ActionDirectory,
}

impl FlowRouter {
    pub fn new(directory: ActionDirectory) -> Self {
        Self { directory }
    }

    /// Route one turn against the current session.
    pub fn route(&self, session: &FlowSession, input: &TurnInput) -> RouterDecision {
        // Wizard input outranks everything while verification is active.
        if session.flow == Flow::LoanVerify {
            if let (Some(progress), Some(answer)) = (&session.wizard, &input.wizard_answer) {
                if progress.wizard_session_id == answer.wizard_session_id {
                    return RouterDecision::SubmitAnswer {
                        wizard_session_id: answer.wizard_session_id.clone(),
                        field_id: answer.field_id.clone(),
                        value: input.message.clone(),
                    };
                }
            }
        }

        // Button actions are honored wherever they arrive; a stale button
        // simply re-enters that action's flow, discarding conflicting state.
        if let Some(action) = input.action {
            return self.route_action(session, action);
        }

        // Keyword heuristics may pull the user into a new flow mid-stream.
        if let Some(heuristic) = rules::evaluate(&input.message) {
            return match heuristic {
                HeuristicIntent::Payment => RouterDecision::Respond {
                    response: self.payment_prompt_response(),
                    update: SessionUpdate::Store(FlowSession::awaiting_payment_type()),
                },
                HeuristicIntent::LoanApplication => RouterDecision::Respond {
                    response: self.loan_type_prompt_response(),
                    update: SessionUpdate::Store(FlowSession::awaiting_loan_type()),
                },
            };
        }

        // An active flow re-prompts rather than guessing at free text.
        match session.flow {
            Flow::PaymentType => RouterDecision::Respond {
                response: self.payment_prompt_response(),
                update: SessionUpdate::Keep,
            },
            Flow::LoanType => RouterDecision::Respond {
                response: self.loan_type_prompt_response(),
                update: SessionUpdate::Keep,
            },
            Flow::LoanBegin => RouterDecision::Respond {
                response: self.loan_begin_response(),
                update: SessionUpdate::Keep,
            },
            Flow::LoanVerify => match &session.wizard {
                Some(progress) => RouterDecision::ResumeWizard {
                    wizard_session_id: progress.wizard_session_id.clone(),
                },
                // Wizard progress lost; abandon the flow instead of wedging.
                None => RouterDecision::Respond {
                    response: self.fallback_response(),
                    update: SessionUpdate::Clear,
                },
            },
            Flow::None => RouterDecision::Classify,
        }
    }

    /// Route a validated classifier result. Never returns `Classify`.
    pub fn route_classified(
        &self,
        _session: &FlowSession,
        result: &ClassifiedIntent,
    ) -> RouterDecision {
        match result.category {
            IntentCategory::Payment => RouterDecision::Respond {
                response: self.payment_prompt_response(),
                update: SessionUpdate::Store(FlowSession::awaiting_payment_type()),
            },
            IntentCategory::LoanApplication => {
                let product = result
                    .loan_type
                    .as_deref()
                    .and_then(LoanProduct::from_text);
                match product {
                    Some(product) => self.enter_loan_begin(product),
                    None => RouterDecision::Respond {
                        response: self.loan_type_prompt_response(),
                        update: SessionUpdate::Store(FlowSession::awaiting_loan_type()),
                    },
                }
            }
            IntentCategory::OutOfScope => RouterDecision::Respond {
                response: TurnResponse::reply(ResolvedIntent::OutOfScope, OUT_OF_SCOPE_REPLY),
                update: SessionUpdate::Keep,
            },
            IntentCategory::General => RouterDecision::AnswerGeneral,
        }
    }

    fn route_action(&self, session: &FlowSession, action: ActionIntent) -> RouterDecision {
        match action {
            ActionIntent::PaymentType(account) => RouterDecision::Respond {
                response: self.payment_link_response(account),
                update: SessionUpdate::Clear,
            },
            ActionIntent::LoanType(product) => self.enter_loan_begin(product),
            ActionIntent::BeginLoanApplication => {
                // Loan type and form id carry over only from a loan flow;
                // a stale begin button starts a generic application.
                let (loan_type, form_id) = if session.flow == Flow::LoanBegin {
                    (
                        session.loan_type,
                        session
                            .form_id
                            .clone()
                            .unwrap_or_else(|| self.directory.loan_application_form_id().to_string()),
                    )
                } else {
                    (None, self.directory.loan_application_form_id().to_string())
                };
                RouterDecision::StartWizard { loan_type, form_id }
            }
        }
    }

    fn enter_loan_begin(&self, product: LoanProduct) -> RouterDecision {
        RouterDecision::Respond {
            response: self.loan_begin_response(),
            update: SessionUpdate::Store(FlowSession::awaiting_loan_begin(
                product,
                self.directory.loan_application_form_id(),
            )),
        }
    }

    // ----- response builders, shared with the application layer -----

    pub fn payment_prompt_response(&self) -> TurnResponse {
        let buttons = PaymentAccount::ALL
            .iter()
            .map(|account| ActionButton::new(account.label(), account.action().as_str()))
            .collect();
        TurnResponse::with_buttons(ResolvedIntent::Payment, PAYMENT_PROMPT, buttons)
    }

    pub fn loan_type_prompt_response(&self) -> TurnResponse {
        let buttons = LoanProduct::ALL
            .iter()
            .map(|product| ActionButton::new(product.label(), product.action().as_str()))
            .collect();
        TurnResponse::with_buttons(ResolvedIntent::LoanApplication, LOAN_TYPE_PROMPT, buttons)
    }

    pub fn payment_link_response(&self, account: PaymentAccount) -> TurnResponse {
        TurnResponse::with_link(
            ResolvedIntent::Payment,
            PAYMENT_LINK_REPLY,
            LinkButton::new("Secure Payment Center", self.directory.payment_url(account)),
        )
    }

    pub fn loan_begin_response(&self) -> TurnResponse {
        TurnResponse::with_buttons(
            ResolvedIntent::LoanApplication,
            LOAN_BEGIN_MESSAGE,
            vec![ActionButton::new(
                "Begin application",
                ActionIntent::BeginLoanApplication.as_str(),
            )],
        )
    }

    pub fn out_of_scope_response(&self) -> TurnResponse {
        TurnResponse::reply(ResolvedIntent::OutOfScope, OUT_OF_SCOPE_REPLY)
    }

    pub fn fallback_response(&self) -> TurnResponse {
        TurnResponse::reply(ResolvedIntent::General, FALLBACK_REPLY)
    }

    pub fn general_response(&self, answer: impl Into<String>) -> TurnResponse {
        TurnResponse::reply(ResolvedIntent::General, answer)
    }

    /// The mocked approval shown after the last wizard answer.
    pub fn loading_directive(&self, loan_type: Option<LoanProduct>) -> LoadingDirective {
        let product = loan_type
            .map(|p| p.label().to_lowercase())
            .unwrap_or_else(|| "loan".to_string());
        LoadingDirective {
            duration_ms: ELIGIBILITY_CHECK_MS,
            approval_message: format!(
                "Good news! Based on the information you provided, you're pre-approved for your {product}."
            ),
            completion_message: COMPLETION_MESSAGE.to_string(),
            completion_button: LinkButton::new(
                "Complete application",
                self.directory.loan_completion_url(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flow::response::ResponsePayload;
    use crate::domain::flow::session::WizardProgress;

    fn router() -> FlowRouter {
        FlowRouter::new(ActionDirectory::new())
    }

    fn verify_session(wizard_id: &str) -> FlowSession {
        FlowSession::in_loan_verification(
            Some(LoanProduct::Auto),
            "2000002",
            WizardProgress {
                wizard_session_id: wizard_id.to_string(),
                step_number: 3,
                total_steps: 9,
            },
        )
    }

    #[test]
    fn payment_keywords_enter_payment_flow() {
        let decision = router().route(
            &FlowSession::new(),
            &TurnInput::message("I want to make a payment"),
        );

        match decision {
            RouterDecision::Respond { response, update } => {
                assert_eq!(response.intent, ResolvedIntent::Payment);
                let labels: Vec<_> = match &response.payload {
                    ResponsePayload::Buttons(buttons) => {
                        buttons.iter().map(|b| b.label.as_str()).collect()
                    }
                    other => panic!("expected buttons, got {other:?}"),
                };
                assert_eq!(labels, ["Mortgage", "Credit Card", "Auto Loan", "Personal Loan"]);
                assert!(matches!(
                    update,
                    SessionUpdate::Store(s) if s.flow == Flow::PaymentType
                ));
            }
            other => panic!("expected respond, got {other:?}"),
        }
    }

    #[test]
    fn payment_type_action_resolves_link_and_clears_session() {
        let decision = router().route(
            &FlowSession::awaiting_payment_type(),
            &TurnInput::message("Auto Loan")
                .with_action(ActionIntent::PaymentType(PaymentAccount::AutoLoan)),
        );

        match decision {
            RouterDecision::Respond { response, update } => {
                assert_eq!(update, SessionUpdate::Clear);
                match response.payload {
                    ResponsePayload::Link(link) => {
                        assert_eq!(link.url, "https://payments.finovabank.example/auto-loan");
                        assert!(link.open_in_new_window);
                    }
                    other => panic!("expected link, got {other:?}"),
                }
            }
            other => panic!("expected respond, got {other:?}"),
        }
    }

    #[test]
    fn stale_payment_button_works_from_no_flow() {
        let decision = router().route(
            &FlowSession::new(),
            &TurnInput::message("click")
                .with_action(ActionIntent::PaymentType(PaymentAccount::Mortgage)),
        );
        assert!(matches!(decision, RouterDecision::Respond { update, .. } if update == SessionUpdate::Clear));
    }

    #[test]
    fn loan_type_action_enters_begin_confirmation() {
        let decision = router().route(
            &FlowSession::awaiting_loan_type(),
            &TurnInput::message("Home Loan").with_action(ActionIntent::LoanType(LoanProduct::Home)),
        );

        match decision {
            RouterDecision::Respond { response, update } => {
                assert_eq!(response.intent, ResolvedIntent::LoanApplication);
                match update {
                    SessionUpdate::Store(session) => {
                        assert_eq!(session.flow, Flow::LoanBegin);
                        assert_eq!(session.loan_type, Some(LoanProduct::Home));
                        assert_eq!(session.form_id.as_deref(), Some("2000002"));
                    }
                    other => panic!("expected store, got {other:?}"),
                }
            }
            other => panic!("expected respond, got {other:?}"),
        }
    }

    #[test]
    fn begin_action_in_loan_begin_starts_wizard_with_loan_type() {
        let session = FlowSession::awaiting_loan_begin(LoanProduct::Personal, "2000002");
        let decision = router().route(
            &session,
            &TurnInput::message("Begin application").with_action(ActionIntent::BeginLoanApplication),
        );

        assert_eq!(
            decision,
            RouterDecision::StartWizard {
                loan_type: Some(LoanProduct::Personal),
                form_id: "2000002".to_string(),
            }
        );
    }

    #[test]
    fn stale_begin_action_starts_generic_wizard() {
        let decision = router().route(
            &FlowSession::new(),
            &TurnInput::message("go").with_action(ActionIntent::BeginLoanApplication),
        );

        assert_eq!(
            decision,
            RouterDecision::StartWizard {
                loan_type: None,
                form_id: "2000002".to_string(),
            }
        );
    }

    #[test]
    fn wizard_answer_outranks_action_and_keywords() {
        let session = verify_session("wiz-1");
        let input = TurnInput::message("pay 500")
            .with_action(ActionIntent::PaymentType(PaymentAccount::Mortgage))
            .with_wizard_answer(WizardAnswer {
                wizard_session_id: "wiz-1".to_string(),
                field_id: "annualIncome".to_string(),
            });

        let decision = router().route(&session, &input);
        assert_eq!(
            decision,
            RouterDecision::SubmitAnswer {
                wizard_session_id: "wiz-1".to_string(),
                field_id: "annualIncome".to_string(),
                value: "pay 500".to_string(),
            }
        );
    }

    #[test]
    fn stale_wizard_answer_is_ignored() {
        let session = verify_session("wiz-current");
        let input = TurnInput::message("hello").with_wizard_answer(WizardAnswer {
            wizard_session_id: "wiz-old".to_string(),
            field_id: "firstName".to_string(),
        });

        // Falls through to the resume path for the active wizard.
        let decision = router().route(&session, &input);
        assert_eq!(
            decision,
            RouterDecision::ResumeWizard {
                wizard_session_id: "wiz-current".to_string(),
            }
        );
    }

    #[test]
    fn keyword_topic_switch_abandons_loan_flow() {
        let decision = router().route(
            &FlowSession::awaiting_loan_type(),
            &TurnInput::message("actually I just want to pay my bill"),
        );
        assert!(matches!(
            decision,
            RouterDecision::Respond {
                update: SessionUpdate::Store(ref s),
                ..
            } if s.flow == Flow::PaymentType
        ));
    }

    #[test]
    fn active_flows_reprompt_on_unrecognized_text() {
        let decision = router().route(
            &FlowSession::awaiting_loan_type(),
            &TurnInput::message("hmm not sure"),
        );
        match decision {
            RouterDecision::Respond { response, update } => {
                assert_eq!(response.reply, LOAN_TYPE_PROMPT);
                assert_eq!(update, SessionUpdate::Keep);
            }
            other => panic!("expected respond, got {other:?}"),
        }
    }

    #[test]
    fn no_flow_and_no_signal_consults_classifier() {
        let decision = router().route(
            &FlowSession::new(),
            &TurnInput::message("what is an index fund?"),
        );
        assert_eq!(decision, RouterDecision::Classify);
    }

    #[test]
    fn classified_payment_enters_payment_flow() {
        let decision = router().route_classified(
            &FlowSession::new(),
            &ClassifiedIntent::new(IntentCategory::Payment, None),
        );
        assert!(matches!(
            decision,
            RouterDecision::Respond {
                update: SessionUpdate::Store(ref s),
                ..
            } if s.flow == Flow::PaymentType
        ));
    }

    #[test]
    fn classified_loan_with_type_skips_type_prompt() {
        let decision = router().route_classified(
            &FlowSession::new(),
            &ClassifiedIntent::new(
                IntentCategory::LoanApplication,
                Some("auto loan".to_string()),
            ),
        );
        match decision {
            RouterDecision::Respond { update, .. } => match update {
                SessionUpdate::Store(session) => {
                    assert_eq!(session.flow, Flow::LoanBegin);
                    assert_eq!(session.loan_type, Some(LoanProduct::Auto));
                }
                other => panic!("expected store, got {other:?}"),
            },
            other => panic!("expected respond, got {other:?}"),
        }
    }

    #[test]
    fn classified_loan_without_type_prompts_for_type() {
        let decision = router().route_classified(
            &FlowSession::new(),
            &ClassifiedIntent::new(IntentCategory::LoanApplication, None),
        );
        assert!(matches!(
            decision,
            RouterDecision::Respond {
                update: SessionUpdate::Store(ref s),
                ..
            } if s.flow == Flow::LoanType
        ));
    }

    #[test]
    fn classified_general_requests_an_answer() {
        let decision = router().route_classified(&FlowSession::new(), &ClassifiedIntent::general());
        assert_eq!(decision, RouterDecision::AnswerGeneral);
    }

    #[test]
    fn classified_out_of_scope_declines_without_state_change() {
        let decision = router().route_classified(
            &FlowSession::new(),
            &ClassifiedIntent::new(IntentCategory::OutOfScope, None),
        );
        match decision {
            RouterDecision::Respond { response, update } => {
                assert_eq!(response.reply, OUT_OF_SCOPE_REPLY);
                assert_eq!(update, SessionUpdate::Keep);
            }
            other => panic!("expected respond, got {other:?}"),
        }
    }

    #[test]
    fn same_state_and_action_always_decide_the_same() {
        let r = router();
        let session = FlowSession::awaiting_payment_type();
        let input = TurnInput::message("x")
            .with_action(ActionIntent::PaymentType(PaymentAccount::CreditCard));
        assert_eq!(r.route(&session, &input), r.route(&session, &input));
    }

    #[test]
    fn loading_directive_mentions_loan_type() {
        let directive = router().loading_directive(Some(LoanProduct::Home));
        assert!(directive.approval_message.contains("home loan"));
        assert_eq!(directive.duration_ms, 5000);
        assert_eq!(
            directive.completion_button.url,
            "https://apply.finovabank.example/loan/complete"
        );
    }
}
