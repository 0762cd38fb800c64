//! Intent classifier adapters.

pub mod mock_classifier;
pub mod openai_classifier;

pub use mock_classifier::MockClassifier;
pub use openai_classifier::{OpenAiClassifier, OpenAiClassifierConfig};
