use std::sync::Arc;

use axum::Router;
use cxhook_core::config::AppConfig;
use cxhook_core::{TagRegistry, WebhookError};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{health, webhook};

pub struct Application {
    pub config: AppConfig,
    pub registry: Arc<TagRegistry>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("fulfillment handlers could not be built: {0}")]
    Handlers(#[source] WebhookError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let registry =
        TagRegistry::with_defaults(&config.fulfillment).map_err(BootstrapError::Handlers)?;
    info!(
        event_name = "system.bootstrap.handlers_registered",
        correlation_id = "bootstrap",
        tags = ?registry.tags(),
        "fulfillment handlers registered"
    );

    Ok(Application { config, registry: Arc::new(registry) })
}

impl Application {
    /// Webhook and health routes behind HTTP request tracing.
    pub fn router(&self) -> Router {
        webhook::router(
            &self.config.server.webhook_path,
            Arc::clone(&self.registry),
            self.config.server.max_body_bytes,
        )
        .merge(health::router(Arc::clone(&self.registry)))
        .layer(TraceLayer::new_for_http())
    }
}
