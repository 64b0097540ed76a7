use cxhook_core::config::{AppConfig, LoadOptions};
use cxhook_core::TagRegistry;

use crate::commands::CommandResult;

/// Reports the registered tags, sorted and comma-separated, in the
/// envelope's `message` field.
pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("tags", "config_validation", error.to_string(), 2)
        }
    };

    match TagRegistry::with_defaults(&config.fulfillment) {
        Ok(registry) => CommandResult::success("tags", registry.tags().join(",")),
        Err(error) => CommandResult::failure("tags", error.error_class(), error.to_string(), 3),
    }
}
