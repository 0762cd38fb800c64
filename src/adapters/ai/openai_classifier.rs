//! OpenAI Classifier - Implementation of IntentClassifier over the chat
//! completions API.
//!
//! Two prompt profiles share one client: a deterministic (temperature 0)
//! classification call that must return a strict JSON object, and a
//! lightly sampled call that writes a short general banking answer.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiClassifierConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let classifier = OpenAiClassifier::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::flow::{ClassifiedIntent, IntentCategory};
use crate::ports::{ClassifierError, IntentClassifier};

const CLASSIFY_SYSTEM_PROMPT: &str = "You are an intent classifier for a retail bank's chat assistant. \
Classify the user's message into exactly one of: loan_application, payment, general, out_of_scope. \
Use loan_application when the user wants to apply for or start a loan. \
Use payment when the user wants to make or ask about a payment on an account. \
Use general for other banking topics such as rates, products, or terminology. \
Use out_of_scope for anything unrelated to banking. \
If the user names a loan type, capture it. \
Respond with only a JSON object of the form \
{\"intent\": \"loan_application|payment|general|out_of_scope\", \"loanType\": \"<type or null>\"} \
and nothing else.";

const GENERAL_SYSTEM_PROMPT: &str = "You are a helpful assistant for a retail bank. \
Answer the customer's banking question accurately in two to three sentences of plain language. \
Do not give personalized financial advice and do not mention that you are an AI.";

/// Configuration for the OpenAI-backed classifier.
#[derive(Debug, Clone)]
pub struct OpenAiClassifierConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiClassifierConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI chat-completions classifier implementation.
pub struct OpenAiClassifier {
    config: OpenAiClassifierConfig,
    client: Client,
}

impl OpenAiClassifier {
    /// Creates a new classifier with the given configuration.
    pub fn new(config: OpenAiClassifierConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
        temperature: f32,
    ) -> Result<String, ClassifierError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_message.to_string(),
                },
            ],
            temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::network(format!(
                        "timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else {
                    ClassifierError::network(e)
                }
            })?;

        let response = self.handle_response_status(response).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::parse(format!("failed to parse response: {e}")))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ClassifierError::parse("no choices in response"))
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, ClassifierError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClassifierError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl IntentClassifier for OpenAiClassifier {
    async fn classify(&self, message: &str) -> Result<ClassifiedIntent, ClassifierError> {
        let content = self.complete(CLASSIFY_SYSTEM_PROMPT, message, 0.0).await?;
        Ok(parse_classification(&content))
    }

    async fn general_answer(&self, message: &str) -> Result<String, ClassifierError> {
        let answer = self.complete(GENERAL_SYSTEM_PROMPT, message, 0.3).await?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(ClassifierError::parse("empty answer"));
        }
        Ok(answer.to_string())
    }
}

/// Parse the model's classification output.
///
/// The model occasionally wraps its JSON in markdown code fences; strip
/// those before parsing. Anything that still fails to parse, or names a
/// category outside the allowed set, degrades to `general`.
fn parse_classification(content: &str) -> ClassifiedIntent {
    let stripped = strip_code_fences(content);

    let raw: RawClassification = match serde_json::from_str(stripped) {
        Ok(raw) => raw,
        Err(_) => return ClassifiedIntent::general(),
    };

    let category = raw
        .intent
        .as_deref()
        .and_then(IntentCategory::parse)
        .unwrap_or(IntentCategory::General);

    let loan_type = raw
        .loan_type
        .filter(|t| !t.trim().is_empty() && t.trim().to_lowercase() != "null");

    ClassifiedIntent::new(category, loan_type)
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}

// ----- Wire Types -----

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct RawClassification {
    intent: Option<String>,
    #[serde(rename = "loanType")]
    loan_type: Option<String>,
}
