//! Tag → handler routing for fulfillment calls.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::config::FulfillmentConfig;
use crate::errors::WebhookError;
use crate::handlers::confirm::{ConfirmHandler, CONFIRM_TAG};
use crate::webhook::{decode_request, encode_response, WebhookRequest, WebhookResponse};

/// Fulfillment logic for one tag.
pub trait TagHandler: Send + Sync {
    fn handle(&self, request: &WebhookRequest) -> Result<WebhookResponse, WebhookError>;
}

impl<F> TagHandler for F
where
    F: Fn(&WebhookRequest) -> Result<WebhookResponse, WebhookError> + Send + Sync,
{
    fn handle(&self, request: &WebhookRequest) -> Result<WebhookResponse, WebhookError> {
        self(request)
    }
}

/// Fixed table of tag handlers, built once at startup and shared read-only.
#[derive(Clone, Default)]
pub struct TagRegistry {
    handlers: BTreeMap<String, Arc<dyn TagHandler>>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in tag wired to `config`.
    pub fn with_defaults(config: &FulfillmentConfig) -> Result<Self, WebhookError> {
        let confirm = ConfirmHandler::new(config).map_err(|error| WebhookError::Render {
            tag: CONFIRM_TAG.to_owned(),
            message: error.to_string(),
        })?;

        let mut registry = Self::new();
        registry.register(CONFIRM_TAG, confirm);
        Ok(registry)
    }

    /// Registers `handler` for `tag`, returning the handler it replaced.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        handler: impl TagHandler + 'static,
    ) -> Option<Arc<dyn TagHandler>> {
        self.handlers.insert(tag.into(), Arc::new(handler))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    pub fn tags(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn dispatch(&self, request: &WebhookRequest) -> Result<WebhookResponse, WebhookError> {
        let tag = request.tag();
        let handler = self
            .handlers
            .get(tag)
            .ok_or_else(|| WebhookError::UnknownTag { tag: tag.to_owned() })?;
        handler.handle(request)
    }

    /// Full decode → dispatch → encode pass over a raw request body.
    pub fn fulfill(&self, body: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let request = decode_request(body)?;
        let response = self.dispatch(&request)?;
        encode_response(&response)
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry").field("tags", &self.tags()).finish()
    }
}
