//! Fulfillment core for the conversational-agent webhook.
//!
//! A call flows linearly through four steps:
//!
//! ```text
//! body bytes → decode_request → TagRegistry::dispatch → TagHandler → encode_response
//! ```
//!
//! Any step may fail with a [`WebhookError`]; all failures are terminal for
//! the call. The registry holds no mutable state and is shared across calls.

pub mod config;
pub mod dispatch;
pub mod errors;
pub mod handlers;
pub mod webhook;

pub use config::{AppConfig, ConfigError, FulfillmentConfig, LoadOptions};
pub use dispatch::{TagHandler, TagRegistry};
pub use errors::WebhookError;
pub use handlers::{ConfirmHandler, CANCEL_PERIOD_PARAMETER, CONFIRM_TAG};
pub use webhook::{
    decode_request, decode_response, encode_response, Parameters, WebhookRequest,
    WebhookResponse,
};
