use std::fs;
use std::path::Path;

use cxhook_core::config::{read_env, resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let entries: [(&str, String, &[&str]); 10] = [
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            &["CXHOOK_SERVER_BIND_ADDRESS"],
        ),
        ("server.port", config.server.port.to_string(), &["CXHOOK_SERVER_PORT"]),
        (
            "server.webhook_path",
            config.server.webhook_path.clone(),
            &["CXHOOK_SERVER_WEBHOOK_PATH"],
        ),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["CXHOOK_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        (
            "server.max_body_bytes",
            config.server.max_body_bytes.to_string(),
            &["CXHOOK_SERVER_MAX_BODY_BYTES"],
        ),
        (
            "fulfillment.cancel_period",
            config.fulfillment.cancel_period.clone(),
            &["CXHOOK_FULFILLMENT_CANCEL_PERIOD"],
        ),
        (
            "fulfillment.pickup_days",
            config.fulfillment.pickup_days.to_string(),
            &["CXHOOK_FULFILLMENT_PICKUP_DAYS"],
        ),
        (
            "fulfillment.confirm_template",
            format!("{:?}", config.fulfillment.confirm_template),
            &["CXHOOK_FULFILLMENT_CONFIRM_TEMPLATE"],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["CXHOOK_LOGGING_LEVEL", "CXHOOK_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["CXHOOK_LOGGING_FORMAT", "CXHOOK_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key_path, value, env_keys) in entries {
        lines.push(render_line(key_path, &value, source(key_path, env_keys)));
    }

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

/// Names the layer a value came from. `env_keys` are checked in the same
/// order and with the same blank-value rule the loader applies.
fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| read_env(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
