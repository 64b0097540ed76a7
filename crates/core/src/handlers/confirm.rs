//! The `confirm` tag: acknowledges a hoodie order and sets the
//! cancellation window the agent reads back to the user.

use serde_json::Value;
use tera::{Context, Tera};

use crate::config::FulfillmentConfig;
use crate::dispatch::TagHandler;
use crate::errors::WebhookError;
use crate::webhook::{WebhookRequest, WebhookResponse};

pub const CONFIRM_TAG: &str = "confirm";
pub const CANCEL_PERIOD_PARAMETER: &str = "cancel-period";

const TEMPLATE_NAME: &str = "confirm";

pub struct ConfirmHandler {
    templates: Tera,
    cancel_period: String,
    pickup_days: u32,
}

impl ConfirmHandler {
    pub fn new(config: &FulfillmentConfig) -> Result<Self, tera::Error> {
        let mut templates = Tera::default();
        templates.add_raw_template(TEMPLATE_NAME, &config.confirm_template)?;

        Ok(Self {
            templates,
            cancel_period: config.cancel_period.clone(),
            pickup_days: config.pickup_days,
        })
    }
}

impl TagHandler for ConfirmHandler {
    fn handle(&self, request: &WebhookRequest) -> Result<WebhookResponse, WebhookError> {
        // Missing `size`/`color` render as empty text rather than failing the turn.
        let mut context = Context::new();
        context.insert("size", &request.parameter_text("size"));
        context.insert("color", &request.parameter_text("color"));
        context.insert("pickup_days", &self.pickup_days);
        context.insert("session", request.session_id());

        let text = self.templates.render(TEMPLATE_NAME, &context).map_err(|error| {
            WebhookError::Render { tag: CONFIRM_TAG.to_owned(), message: error.to_string() }
        })?;

        Ok(WebhookResponse::for_session(request.session_id())
            .with_text(text)
            .with_parameter(CANCEL_PERIOD_PARAMETER, Value::String(self.cancel_period.clone())))
    }
}
