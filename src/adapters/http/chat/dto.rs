//! Request and response DTOs for the chat endpoints.
//!
//! Wire casing is camelCase to match the chat widget. The response body
//! flattens the router's payload variants into optional fields so the
//! client can branch on whichever one is present.

use serde::{Deserialize, Serialize};

use crate::domain::flow::{
    ActionButton, InputPrompt, LinkButton, LoadingDirective, ResponsePayload, TurnResponse,
};

/// POST /api/chat request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestBody {
    #[serde(default)]
    pub message: String,
    /// Client-chosen conversation key; the peer address is used when absent.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Action identifier of a clicked button.
    #[serde(default)]
    pub action_intent: Option<String>,
    /// Echo of the input request the message answers, when the widget is
    /// mid-wizard.
    #[serde(default)]
    pub input_request: Option<InputRequestRef>,
}

/// Wizard run and field a message answers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRequestRef {
    pub session_id: String,
    pub field_id: String,
}

/// POST /api/chat response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponseBody {
    pub reply: String,
    pub intent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ButtonDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<LinkButtonDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_request: Option<InputRequestDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading: Option<LoadingDto>,
}

impl From<TurnResponse> for ChatResponseBody {
    fn from(response: TurnResponse) -> Self {
        let mut body = Self {
            reply: response.reply,
            intent: response.intent.as_str().to_string(),
            buttons: None,
            button: None,
            input_request: None,
            loading: None,
        };
        match response.payload {
            ResponsePayload::None => {}
            ResponsePayload::Buttons(buttons) => {
                body.buttons = Some(buttons.into_iter().map(ButtonDto::from).collect());
            }
            ResponsePayload::Link(link) => body.button = Some(LinkButtonDto::from(link)),
            ResponsePayload::Input(input) => {
                body.input_request = Some(InputRequestDto::from(input));
            }
            ResponsePayload::Loading(loading) => body.loading = Some(LoadingDto::from(loading)),
        }
        body
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonDto {
    pub label: String,
    pub action_intent: String,
}

impl From<ActionButton> for ButtonDto {
    fn from(button: ActionButton) -> Self {
        Self {
            label: button.label,
            action_intent: button.action_intent,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkButtonDto {
    pub label: String,
    pub url: String,
    pub open_in_new_window: bool,
}

impl From<LinkButton> for LinkButtonDto {
    fn from(link: LinkButton) -> Self {
        Self {
            label: link.label,
            url: link.url,
            open_in_new_window: link.open_in_new_window,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRequestDto {
    pub session_id: String,
    pub field_id: String,
    pub input_type: String,
    pub step_number: usize,
    pub total_steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefill_value: Option<String>,
    pub label: String,
}

impl From<InputPrompt> for InputRequestDto {
    fn from(input: InputPrompt) -> Self {
        Self {
            session_id: input.session_id,
            field_id: input.field_id,
            input_type: input.input_type,
            step_number: input.step_number,
            total_steps: input.total_steps,
            prefill_value: input.prefill_value,
            label: input.label,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingDto {
    pub duration_ms: u64,
    pub approval_message: String,
    pub completion_message: String,
    pub completion_button: LinkButtonDto,
}

impl From<LoadingDirective> for LoadingDto {
    fn from(loading: LoadingDirective) -> Self {
        Self {
            duration_ms: loading.duration_ms,
            approval_message: loading.approval_message,
            completion_message: loading.completion_message,
            completion_button: LinkButtonDto::from(loading.completion_button),
        }
    }
}

/// POST /api/login request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/login response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseBody {
    pub success: bool,
    pub message: String,
}

/// Error envelope shared by the chat endpoints. The message goes under
/// `reply` so the widget renders it like any other assistant turn.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub reply: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            reply: message.into(),
        }
    }
}
