use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tera::Tera;
use thiserror::Error;

pub const DEFAULT_CONFIRM_TEMPLATE: &str =
    "You can pick up your order for a {{ color }} {{ size }} hoodie in {{ pickup_days }} days.";

const HEALTH_PATH: &str = "/health";

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub fulfillment: FulfillmentConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub webhook_path: String,
    pub graceful_shutdown_secs: u64,
    pub max_body_bytes: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FulfillmentConfig {
    pub cancel_period: String,
    pub pickup_days: u32,
    pub confirm_template: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            webhook_path: "/webhook".to_string(),
            graceful_shutdown_secs: 15,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            cancel_period: "2".to_string(),
            pickup_days: 5,
            confirm_template: DEFAULT_CONFIRM_TEMPLATE.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl ServerConfig {
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("cxhook.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(webhook_path) = server.webhook_path {
                self.server.webhook_path = webhook_path;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
            if let Some(max_body_bytes) = server.max_body_bytes {
                self.server.max_body_bytes = max_body_bytes;
            }
        }

        if let Some(fulfillment) = patch.fulfillment {
            if let Some(cancel_period) = fulfillment.cancel_period {
                self.fulfillment.cancel_period = cancel_period;
            }
            if let Some(pickup_days) = fulfillment.pickup_days {
                self.fulfillment.pickup_days = pickup_days;
            }
            if let Some(confirm_template) = fulfillment.confirm_template {
                self.fulfillment.confirm_template = confirm_template;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("CXHOOK_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("CXHOOK_SERVER_PORT") {
            self.server.port = parse_env("CXHOOK_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("CXHOOK_SERVER_WEBHOOK_PATH") {
            self.server.webhook_path = value;
        }
        if let Some(value) = read_env("CXHOOK_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_env("CXHOOK_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }
        if let Some(value) = read_env("CXHOOK_SERVER_MAX_BODY_BYTES") {
            self.server.max_body_bytes = parse_env("CXHOOK_SERVER_MAX_BODY_BYTES", &value)?;
        }

        if let Some(value) = read_env("CXHOOK_FULFILLMENT_CANCEL_PERIOD") {
            self.fulfillment.cancel_period = value;
        }
        if let Some(value) = read_env("CXHOOK_FULFILLMENT_PICKUP_DAYS") {
            self.fulfillment.pickup_days = parse_env("CXHOOK_FULFILLMENT_PICKUP_DAYS", &value)?;
        }
        if let Some(value) = read_env("CXHOOK_FULFILLMENT_CONFIRM_TEMPLATE") {
            self.fulfillment.confirm_template = value;
        }

        let log_level = read_env("CXHOOK_LOGGING_LEVEL").or_else(|| read_env("CXHOOK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CXHOOK_LOGGING_FORMAT").or_else(|| read_env("CXHOOK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.server)?;
        validate_fulfillment(&self.fulfillment)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Config file that `AppConfig::load` would read for `explicit_path`, if any.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("cxhook.toml"), PathBuf::from("config/cxhook.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

/// Expands `${VAR}` references outside of `#` comments.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        let (body, comment) = split_comment(line);
        interpolate_segment(body, &mut output)?;
        output.push_str(comment);
    }

    Ok(output)
}

fn interpolate_segment(input: &str, output: &mut String) -> Result<(), ConfigError> {
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(())
}

/// Splits a line at the first `#` that is not inside a quoted string.
fn split_comment(line: &str) -> (&str, &str) {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (index, ch) in line.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if ch == '\\' => escaped = true,
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch == '#' => return line.split_at(index),
            None => {}
        }
    }

    (line, "")
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if !server.webhook_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "server.webhook_path must start with `/` (got `{}`)",
            server.webhook_path
        )));
    }
    if server.webhook_path == HEALTH_PATH {
        return Err(ConfigError::Validation(
            "server.webhook_path must not collide with the health endpoint `/health`".to_string(),
        ));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    if server.max_body_bytes == 0 {
        return Err(ConfigError::Validation(
            "server.max_body_bytes must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_fulfillment(fulfillment: &FulfillmentConfig) -> Result<(), ConfigError> {
    if fulfillment.cancel_period.trim().is_empty() {
        return Err(ConfigError::Validation(
            "fulfillment.cancel_period must not be empty".to_string(),
        ));
    }

    let mut tera = Tera::default();
    tera.add_raw_template("confirm", &fulfillment.confirm_template).map_err(|error| {
        ConfigError::Validation(format!(
            "fulfillment.confirm_template is not a valid template: {error}"
        ))
    })?;

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

/// Value of `key` when it is set to something other than blank text.
pub fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    fulfillment: Option<FulfillmentPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    webhook_path: Option<String>,
    graceful_shutdown_secs: Option<u64>,
    max_body_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct FulfillmentPatch {
    cancel_period: Option<String>,
    pickup_days: Option<u32>,
    confirm_template: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{
        interpolate_env_vars, split_comment, AppConfig, ConfigError, ConfigOverrides, LoadOptions,
        LogFormat,
    };

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_match_the_reference_agent() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.server.webhook_path == "/webhook", "default webhook path")?;
        ensure(config.server.listen_address() == "127.0.0.1:8080", "default listen address")?;
        ensure(config.fulfillment.cancel_period == "2", "default cancel period")?;
        ensure(config.fulfillment.pickup_days == 5, "default pickup days")?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_CXHOOK_CANCEL_PERIOD", "4");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("cxhook.toml");
            fs::write(
                &path,
                r#"
[fulfillment]
cancel_period = "${TEST_CXHOOK_CANCEL_PERIOD}"
pickup_days = 9
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.fulfillment.cancel_period == "4",
                "cancel period should be interpolated from environment",
            )?;
            ensure(config.fulfillment.pickup_days == 9, "pickup days should be read from file")
        })();

        clear_vars(&["TEST_CXHOOK_CANCEL_PERIOD"]);
        result
    }

    #[test]
    fn unset_interpolation_variable_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("cxhook.toml");
        fs::write(&path, "[server]\nbind_address = \"${CXHOOK_TEST_UNSET_VARIABLE}\"\n")
            .map_err(|err| err.to_string())?;

        let error =
            match AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
            {
                Ok(_) => return Err("expected interpolation failure".to_string()),
                Err(error) => error,
            };
        ensure(
            matches!(
                error,
                ConfigError::MissingEnvInterpolation { ref var } if var == "CXHOOK_TEST_UNSET_VARIABLE"
            ),
            "interpolation failure should name the variable",
        )
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CXHOOK_LOG_LEVEL", "warn");
        env::set_var("CXHOOK_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["CXHOOK_LOG_LEVEL", "CXHOOK_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CXHOOK_SERVER_PORT", "9090");
        env::set_var("CXHOOK_FULFILLMENT_CANCEL_PERIOD", "3");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("cxhook.toml");
            fs::write(
                &path,
                r#"
[server]
bind_address = "0.0.0.0"
port = 7070
webhook_path = "/cx"

[fulfillment]
cancel_period = "1"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.server.bind_address == "0.0.0.0", "file bind address should win")?;
            ensure(config.server.webhook_path == "/cx", "file webhook path should win")?;
            ensure(config.server.port == 9090, "env port should win over file")?;
            ensure(config.fulfillment.cancel_period == "3", "env cancel period should win")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            Ok(())
        })();

        clear_vars(&["CXHOOK_SERVER_PORT", "CXHOOK_FULFILLMENT_CANCEL_PERIOD"]);
        result
    }

    #[test]
    fn invalid_numeric_env_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CXHOOK_SERVER_PORT", "not-a-port");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => return Err("expected override failure".to_string()),
                Err(error) => error,
            };
            ensure(
                matches!(error, ConfigError::InvalidEnvOverride { ref key, .. } if key == "CXHOOK_SERVER_PORT"),
                "override failure should name the variable",
            )
        })();

        clear_vars(&["CXHOOK_SERVER_PORT"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CXHOOK_SERVER_WEBHOOK_PATH", "/health");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("server.webhook_path")
            );
            ensure(has_message, "validation failure should mention server.webhook_path")
        })();

        clear_vars(&["CXHOOK_SERVER_WEBHOOK_PATH"]);
        result
    }

    #[test]
    fn broken_template_is_rejected_at_load() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CXHOOK_FULFILLMENT_CONFIRM_TEMPLATE", "{{ size");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => return Err("expected template validation failure".to_string()),
                Err(error) => error,
            };
            ensure(
                matches!(
                    error,
                    ConfigError::Validation(ref message) if message.contains("fulfillment.confirm_template")
                ),
                "validation failure should mention fulfillment.confirm_template",
            )
        })();

        clear_vars(&["CXHOOK_FULFILLMENT_CONFIRM_TEMPLATE"]);
        result
    }

    #[test]
    fn missing_required_file_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("absent.toml");
        let error = match AppConfig::load(LoadOptions {
            config_path: Some(path.clone()),
            require_file: true,
            ..LoadOptions::default()
        }) {
            Ok(_) => return Err("expected missing file failure".to_string()),
            Err(error) => error,
        };
        ensure(
            matches!(error, ConfigError::MissingConfigFile(ref missing) if *missing == path),
            "missing file error should carry the requested path",
        )
    }

    #[test]
    fn interpolation_skips_comments() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::remove_var("CXHOOK_TEST_COMMENTED_VARIABLE");
        env::set_var("CXHOOK_TEST_LIVE_VARIABLE", "live");

        let result = (|| -> Result<(), String> {
            let raw = "# uses ${CXHOOK_TEST_COMMENTED_VARIABLE}\n\
                       port = 1 # ${CXHOOK_TEST_COMMENTED_VARIABLE}\n\
                       path = \"/a#${CXHOOK_TEST_LIVE_VARIABLE}\"\n";
            let expanded = interpolate_env_vars(raw).map_err(|err| err.to_string())?;

            ensure(
                expanded.contains("# uses ${CXHOOK_TEST_COMMENTED_VARIABLE}\n"),
                "full-line comment should be left untouched",
            )?;
            ensure(
                expanded.contains("port = 1 # ${CXHOOK_TEST_COMMENTED_VARIABLE}\n"),
                "trailing comment should be left untouched",
            )?;
            ensure(
                expanded.contains("path = \"/a#live\""),
                "hash inside a string is not a comment",
            )
        })();

        clear_vars(&["CXHOOK_TEST_LIVE_VARIABLE"]);
        result
    }

    #[test]
    fn comment_split_respects_quotes_and_escapes() {
        assert_eq!(split_comment("a = 1 # note\n"), ("a = 1 ", "# note\n"));
        assert_eq!(split_comment("a = 'x#y'\n"), ("a = 'x#y'\n", ""));
        assert_eq!(split_comment("a = \"q\\\"#\" # c"), ("a = \"q\\\"#\" ", "# c"));
    }

    #[test]
    fn shipped_example_config_loads() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::remove_var("VAR");
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../config/cxhook.example.toml");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(path),
            require_file: true,
            ..LoadOptions::default()
        })
        .map_err(|err| format!("example config failed to load: {err}"))?;

        ensure(config.server.bind_address == "0.0.0.0", "example bind address should apply")?;
        ensure(config.fulfillment.cancel_period == "2", "example cancel period should apply")
    }
}
