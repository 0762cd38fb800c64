//! CallVu Form Client - Implementation of FormProvider over the CallVu
//! studio API.
//!
//! The service exposes the same tools over two transports: a direct REST
//! endpoint per tool, and a JSON-RPC endpoint wrapping tool calls in an
//! envelope. The REST route is primary; when it is unreachable or failing
//! server-side the client retries once over JSON-RPC before giving up.
//! Client errors (4xx) are returned as-is on the assumption that retrying
//! the same bad request elsewhere cannot help.
//!
//! Field definitions arrive in varying shapes depending on form vintage,
//! so parsing is deliberately tolerant about key names.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::domain::wizard::{FieldAnswer, FieldDescriptor, InputKind};
use crate::ports::{FormDetail, FormProvider, FormProviderError};

const GET_FORM_DETAILS_TOOL: &str = "get_form_details";
const LAUNCH_FORM_TOOL: &str = "launch_form";

/// Configuration for the CallVu client.
#[derive(Debug, Clone)]
pub struct CallvuConfig {
    /// Organization (tenant) identifier.
    pub org_id: String,
    /// Bearer token for authentication.
    token: Secret<String>,
    /// Service base URL, without a trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl CallvuConfig {
    pub fn new(
        org_id: impl Into<String>,
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            org_id: org_id.into(),
            token: Secret::new(token.into()),
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

/// CallVu form provider implementation.
pub struct CallvuFormClient {
    config: CallvuConfig,
    client: Client,
}

impl CallvuFormClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: CallvuConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn tool_url(&self, tool: &str) -> String {
        format!("{}/orgs/{}/tools/{}", self.config.base_url, self.config.org_id, tool)
    }

    fn rpc_url(&self) -> String {
        format!("{}/rpc", self.config.base_url)
    }

    /// Call a tool over the primary REST transport.
    async fn call_rest(
        &self,
        tool: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, FormProviderError> {
        let response = self
            .client
            .post(self.tool_url(tool))
            .bearer_auth(self.config.token())
            .json(&arguments)
            .send()
            .await
            .map_err(FormProviderError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FormProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(FormProviderError::parse)
    }

    /// Call a tool over the secondary JSON-RPC transport.
    async fn call_rpc(
        &self,
        tool: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, FormProviderError> {
        let envelope = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": tool, "arguments": arguments },
        });

        let response = self
            .client
            .post(self.rpc_url())
            .bearer_auth(self.config.token())
            .json(&envelope)
            .send()
            .await
            .map_err(FormProviderError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FormProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: RpcEnvelope = response.json().await.map_err(FormProviderError::parse)?;
        if let Some(error) = envelope.error {
            return Err(FormProviderError::Http {
                status: 0,
                body: error.message,
            });
        }
        let result = envelope
            .result
            .ok_or_else(|| FormProviderError::parse("rpc response has no result"))?;
        unwrap_rpc_result(result)
    }

    /// Call a tool, preferring REST and retrying once over JSON-RPC when
    /// the failure looks like service trouble rather than a bad request.
    async fn call_tool(
        &self,
        tool: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, FormProviderError> {
        match self.call_rest(tool, arguments.clone()).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_fallback_eligible() => {
                debug!(tool, error = %err, "rest transport failed, retrying over rpc");
                self.call_rpc(tool, arguments).await
            }
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl FormProvider for CallvuFormClient {
    async fn fetch_form(&self, form_id: &str) -> Result<FormDetail, FormProviderError> {
        let value = self
            .call_tool(GET_FORM_DETAILS_TOOL, json!({ "formId": form_id }))
            .await?;

        let raw: RawForm = serde_json::from_value(value).map_err(FormProviderError::parse)?;
        Ok(FormDetail {
            form_id: raw.id.unwrap_or_else(|| form_id.to_string()),
            name: raw.name,
            fields: raw
                .fields
                .into_iter()
                .filter_map(RawField::into_descriptor)
                .collect(),
        })
    }

    async fn launch_form(
        &self,
        form_id: &str,
        answers: &[FieldAnswer],
    ) -> Result<String, FormProviderError> {
        let metadata: serde_json::Map<String, serde_json::Value> = answers
            .iter()
            .map(|a| (a.field_id.clone(), serde_json::Value::from(a.value.clone())))
            .collect();

        let value = self
            .call_tool(
                LAUNCH_FORM_TOOL,
                json!({ "formId": form_id, "metadata": metadata }),
            )
            .await?;

        let raw: RawLaunch = serde_json::from_value(value).map_err(FormProviderError::parse)?;
        raw.url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| FormProviderError::parse("launch response has no url"))
    }
}

/// Unwrap a JSON-RPC tool result. Some deployments return the payload
/// directly; others wrap it as a text content block holding JSON.
fn unwrap_rpc_result(result: serde_json::Value) -> Result<serde_json::Value, FormProviderError> {
    if let Some(text) = result
        .get("content")
        .and_then(|c| c.as_array())
        .and_then(|blocks| blocks.first())
        .and_then(|block| block.get("text"))
        .and_then(|t| t.as_str())
    {
        return serde_json::from_str(text).map_err(FormProviderError::parse);
    }
    Ok(result)
}

// ----- Wire Types -----

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<serde_json::Value>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawForm {
    #[serde(default, alias = "formId")]
    id: Option<String>,
    #[serde(default, alias = "title")]
    name: Option<String>,
    #[serde(default, alias = "questions")]
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    #[serde(default, alias = "name", alias = "fieldId")]
    id: Option<String>,
    #[serde(default, alias = "title", alias = "prompt")]
    label: Option<String>,
    #[serde(default, rename = "type", alias = "inputType")]
    kind: Option<String>,
    #[serde(default, alias = "prefill", alias = "defaultValue")]
    value: Option<String>,
}

impl RawField {
    fn into_descriptor(self) -> Option<FieldDescriptor> {
        let id = self.id.filter(|i| !i.trim().is_empty())?;
        let label = self
            .label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| id.clone());
        let kind = self
            .kind
            .as_deref()
            .map(InputKind::from_hint)
            .unwrap_or(InputKind::Text);

        let mut field = FieldDescriptor::new(id, label, kind);
        if let Some(value) = self.value.filter(|v| !v.trim().is_empty()) {
            field = field.with_prefill(value);
        }
        Some(field)
    }
}

#[derive(Debug, Deserialize)]
struct RawLaunch {
    #[serde(default, alias = "launchUrl", alias = "link")]
    url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_form(value: serde_json::Value) -> Vec<FieldDescriptor> {
        let raw: RawForm = serde_json::from_value(value).unwrap();
        raw.fields
            .into_iter()
            .filter_map(RawField::into_descriptor)
            .collect()
    }

    #[test]
    fn parses_canonical_field_shape() {
        let fields = parse_form(json!({
            "formId": "2000002",
            "name": "Loan Application",
            "fields": [
                { "id": "firstName", "label": "First name", "type": "text", "value": "Greg" },
                { "id": "email", "label": "Email", "type": "email" },
            ],
        }));
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].prefill.as_deref(), Some("Greg"));
        assert_eq!(fields[1].input_kind, InputKind::Email);
    }

    #[test]
    fn parses_legacy_aliases() {
        let fields = parse_form(json!({
            "id": "2000002",
            "questions": [
                { "name": "phone", "title": "Phone number", "inputType": "tel", "prefill": "555" },
            ],
        }));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].id, "phone");
        assert_eq!(fields[0].label, "Phone number");
        assert_eq!(fields[0].input_kind, InputKind::Phone);
        assert_eq!(fields[0].prefill.as_deref(), Some("555"));
    }

    #[test]
    fn drops_fields_without_ids_and_defaults_labels() {
        let fields = parse_form(json!({
            "fields": [
                { "label": "orphan" },
                { "id": "ssnLast4" },
            ],
        }));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].label, "ssnLast4");
        assert_eq!(fields[0].input_kind, InputKind::Text);
    }

    #[test]
    fn unwraps_text_content_rpc_results() {
        let wrapped = json!({
            "content": [
                { "type": "text", "text": "{\"url\": \"https://example.com/form\"}" },
            ],
        });
        let value = unwrap_rpc_result(wrapped).unwrap();
        assert_eq!(value["url"], "https://example.com/form");

        let direct = json!({ "url": "https://example.com/form" });
        let value = unwrap_rpc_result(direct).unwrap();
        assert_eq!(value["url"], "https://example.com/form");
    }

    #[test]
    fn tool_urls_embed_org_and_tool() {
        let client = CallvuFormClient::new(CallvuConfig::new(
            "org-9",
            "secret",
            "https://studio.callvu.net/api",
        ));
        assert_eq!(
            client.tool_url("get_form_details"),
            "https://studio.callvu.net/api/orgs/org-9/tools/get_form_details"
        );
        assert_eq!(client.rpc_url(), "https://studio.callvu.net/api/rpc");
    }
}
