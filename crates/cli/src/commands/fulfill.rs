use std::fs;
use std::io::{self, Read};
use std::path::Path;

use cxhook_core::config::{AppConfig, LoadOptions};
use cxhook_core::{decode_response, TagRegistry};

use crate::commands::CommandResult;

/// Reads the request body from `file`, or stdin when no file is given.
pub fn run(file: Option<&Path>) -> CommandResult {
    let body = match file {
        Some(path) => fs::read(path).map_err(|error| format!("{}: {error}", path.display())),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer).map(|_| buffer).map_err(|error| error.to_string())
        }
    };

    match body {
        Ok(body) => run_with_body(&body),
        Err(message) => CommandResult::failure("fulfill", "input", message, 4),
    }
}

/// Runs one request body through the configured handlers. The webhook's
/// response is decoded again and printed as pretty JSON, so key order and
/// whitespace differ from the bytes the server sends.
pub fn run_with_body(body: &[u8]) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("fulfill", "config_validation", error.to_string(), 2)
        }
    };

    let registry = match TagRegistry::with_defaults(&config.fulfillment) {
        Ok(registry) => registry,
        Err(error) => {
            return CommandResult::failure("fulfill", error.error_class(), error.to_string(), 3)
        }
    };

    let encoded = match registry.fulfill(body) {
        Ok(encoded) => encoded,
        Err(error) => {
            return CommandResult::failure(
                "fulfill",
                error.error_class(),
                format!("ERROR: {error}"),
                5,
            )
        }
    };

    // Re-decode so the printed form is pretty and stable.
    let output = decode_response(&encoded)
        .ok()
        .and_then(|response| serde_json::to_string_pretty(&response).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(&encoded).into_owned());

    CommandResult { exit_code: 0, output }
}
