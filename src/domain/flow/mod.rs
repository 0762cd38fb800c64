//! Conversational flow domain: the router state machine and its types.

pub mod action;
pub mod classify;
pub mod directory;
pub mod response;
pub mod rules;
pub mod router;
pub mod session;

pub use action::{ActionIntent, LoanProduct, PaymentAccount};
pub use classify::{ClassifiedIntent, IntentCategory};
pub use directory::ActionDirectory;
pub use response::{
    ActionButton, InputPrompt, LinkButton, LoadingDirective, ResolvedIntent, ResponsePayload,
    TurnResponse,
};
pub use router::{FlowRouter, RouterDecision, SessionUpdate, TurnInput, WizardAnswer};
pub use session::{Flow, FlowSession, WizardProgress};
