//! Mock Classifier - Scriptable IntentClassifier for tests and offline
//! runs.
//!
//! Responses are queued ahead of time and handed out in order; every call
//! is recorded so tests can assert what was asked. With nothing queued the
//! mock returns the safe `general` default, which also makes it a usable
//! stand-in when no API key is configured.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::flow::ClassifiedIntent;
use crate::ports::{ClassifierError, IntentClassifier};

const DEFAULT_ANSWER: &str =
    "That's a great question. Our advisors can walk you through the details of any of our banking products.";

#[derive(Default)]
struct MockState {
    classify_queue: VecDeque<Result<ClassifiedIntent, ClassifierError>>,
    answer_queue: VecDeque<Result<String, ClassifierError>>,
    classify_calls: Vec<String>,
    answer_calls: Vec<String>,
}

/// Queue-driven classifier double.
#[derive(Default)]
pub struct MockClassifier {
    state: Mutex<MockState>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next classification result.
    pub fn push_classification(&self, result: Result<ClassifiedIntent, ClassifierError>) {
        if let Ok(mut state) = self.state.lock() {
            state.classify_queue.push_back(result);
        }
    }

    /// Queue the next general-answer result.
    pub fn push_answer(&self, result: Result<String, ClassifierError>) {
        if let Ok(mut state) = self.state.lock() {
            state.answer_queue.push_back(result);
        }
    }

    /// Messages passed to `classify`, in call order.
    pub fn classify_calls(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.classify_calls.clone())
            .unwrap_or_default()
    }

    /// Messages passed to `general_answer`, in call order.
    pub fn answer_calls(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.answer_calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl IntentClassifier for MockClassifier {
    async fn classify(&self, message: &str) -> Result<ClassifiedIntent, ClassifierError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ClassifierError::network("mock state poisoned"))?;
        state.classify_calls.push(message.to_string());
        state
            .classify_queue
            .pop_front()
            .unwrap_or_else(|| Ok(ClassifiedIntent::general()))
    }

    async fn general_answer(&self, message: &str) -> Result<String, ClassifierError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ClassifierError::network("mock state poisoned"))?;
        state.answer_calls.push(message.to_string());
        state
            .answer_queue
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_ANSWER.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flow::IntentCategory;

    #[tokio::test]
    async fn returns_queued_results_in_order() {
        let mock = MockClassifier::new();
        mock.push_classification(Ok(ClassifiedIntent::new(IntentCategory::Payment, None)));
        mock.push_classification(Err(ClassifierError::Unconfigured));

        let first = mock.classify("pay my bill").await.unwrap();
        assert_eq!(first.category, IntentCategory::Payment);
        assert!(mock.classify("again").await.is_err());
    }

    #[tokio::test]
    async fn empty_queue_returns_general_default() {
        let mock = MockClassifier::new();
        let result = mock.classify("what is APR?").await.unwrap();
        assert_eq!(result.category, IntentCategory::General);
        assert!(!mock.general_answer("what is APR?").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn records_calls() {
        let mock = MockClassifier::new();
        let _ = mock.classify("one").await;
        let _ = mock.general_answer("two").await;
        assert_eq!(mock.classify_calls(), ["one"]);
        assert_eq!(mock.answer_calls(), ["two"]);
    }
}
