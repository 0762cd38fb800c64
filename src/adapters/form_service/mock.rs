//! Mock Form Provider - Scriptable FormProvider for tests and offline
//! runs.
//!
//! Behaves like an unconfigured deployment by default: form fetches fail
//! with `Unconfigured`, which pushes the wizard onto its demo fields.
//! When given an org id it can still mint viewer launch URLs from the
//! action directory, mirroring what the live service would return.
//! Tests can queue explicit results and inspect recorded calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::flow::ActionDirectory;
use crate::domain::wizard::FieldAnswer;
use crate::ports::{FormDetail, FormProvider, FormProviderError};

/// A recorded launch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedLaunch {
    pub form_id: String,
    pub answer_count: usize,
}

#[derive(Default)]
struct MockState {
    fetch_queue: VecDeque<Result<FormDetail, FormProviderError>>,
    launch_queue: VecDeque<Result<String, FormProviderError>>,
    fetch_calls: Vec<String>,
    launch_calls: Vec<RecordedLaunch>,
}

/// Queue-driven form provider double.
#[derive(Default)]
pub struct MockFormProvider {
    state: Mutex<MockState>,
    org_id: Option<String>,
    directory: ActionDirectory,
}

impl MockFormProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables directory-built launch URLs, as a configured org would see.
    pub fn with_org(org_id: impl Into<String>) -> Self {
        Self {
            org_id: Some(org_id.into()),
            ..Self::default()
        }
    }

    /// Queue the next `fetch_form` result.
    pub fn push_form(&self, result: Result<FormDetail, FormProviderError>) {
        if let Ok(mut state) = self.state.lock() {
            state.fetch_queue.push_back(result);
        }
    }

    /// Queue the next `launch_form` result.
    pub fn push_launch(&self, result: Result<String, FormProviderError>) {
        if let Ok(mut state) = self.state.lock() {
            state.launch_queue.push_back(result);
        }
    }

    /// Form ids passed to `fetch_form`, in call order.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.fetch_calls.clone())
            .unwrap_or_default()
    }

    /// Launch calls, in call order.
    pub fn launch_calls(&self) -> Vec<RecordedLaunch> {
        self.state
            .lock()
            .map(|state| state.launch_calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FormProvider for MockFormProvider {
    async fn fetch_form(&self, form_id: &str) -> Result<FormDetail, FormProviderError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| FormProviderError::transport("mock state poisoned"))?;
        state.fetch_calls.push(form_id.to_string());
        state
            .fetch_queue
            .pop_front()
            .unwrap_or(Err(FormProviderError::Unconfigured))
    }

    async fn launch_form(
        &self,
        form_id: &str,
        answers: &[FieldAnswer],
    ) -> Result<String, FormProviderError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| FormProviderError::transport("mock state poisoned"))?;
        state.launch_calls.push(RecordedLaunch {
            form_id: form_id.to_string(),
            answer_count: answers.len(),
        });
        if let Some(result) = state.launch_queue.pop_front() {
            return result;
        }
        self.directory
            .form_launch_url(form_id, self.org_id.as_deref())
            .ok_or(FormProviderError::Unconfigured)
    }
}
