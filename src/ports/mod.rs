//! Outbound dependency boundaries, implemented by adapters.

pub mod form_provider;
pub mod intent_classifier;
pub mod session_store;

pub use form_provider::{FormDetail, FormProvider, FormProviderError};
pub use intent_classifier::{ClassifierError, IntentClassifier};
pub use session_store::SessionStore;
