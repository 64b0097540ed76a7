//! Wire types for the fulfillment webhook exchange.
//!
//! Only the members the handlers read or write are modelled. Everything
//! else the agent platform sends is ignored on decode.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::WebhookError;

/// Session parameters keyed by name. Values are untyped JSON.
pub type Parameters = Map<String, Value>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub fulfillment_info: FulfillmentInfo,
    #[serde(default)]
    pub session_info: SessionInfo,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentInfo {
    pub tag: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session: String,
    #[serde(default)]
    pub parameters: Parameters,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_response: FulfillmentResponse,
    #[serde(default)]
    pub session_info: SessionInfo,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentResponse {
    #[serde(default)]
    pub messages: Vec<ResponseMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub text: Text,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    #[serde(default)]
    pub text: Vec<String>,
}

impl WebhookRequest {
    pub fn tag(&self) -> &str {
        &self.fulfillment_info.tag
    }

    pub fn session_id(&self) -> &str {
        &self.session_info.session
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.session_info.parameters.get(name)
    }

    /// Text form of a session parameter for interpolation into a reply.
    ///
    /// Missing and `null` parameters render as an empty string.
    pub fn parameter_text(&self, name: &str) -> String {
        render_parameter(self.parameter(name))
    }
}

impl WebhookResponse {
    pub fn for_session(session: impl Into<String>) -> Self {
        Self {
            fulfillment_response: FulfillmentResponse::default(),
            session_info: SessionInfo { session: session.into(), parameters: Parameters::new() },
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.fulfillment_response
            .messages
            .push(ResponseMessage { text: Text { text: vec![text.into()] } });
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.session_info.parameters.insert(name.into(), value.into());
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_info.session
    }

    pub fn output_parameters(&self) -> &Parameters {
        &self.session_info.parameters
    }

    /// All text lines across messages, in message order.
    pub fn texts(&self) -> Vec<&str> {
        self.fulfillment_response
            .messages
            .iter()
            .flat_map(|message| message.text.text.iter().map(String::as_str))
            .collect()
    }
}

pub fn render_parameter(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn decode_request(body: &[u8]) -> Result<WebhookRequest, WebhookError> {
    serde_json::from_slice(body).map_err(WebhookError::Decode)
}

pub fn encode_response(response: &WebhookResponse) -> Result<Vec<u8>, WebhookError> {
    serde_json::to_vec(response).map_err(WebhookError::Encode)
}

pub fn decode_response(body: &[u8]) -> Result<WebhookResponse, WebhookError> {
    serde_json::from_slice(body).map_err(WebhookError::Decode)
}
