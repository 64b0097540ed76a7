use std::time::{Duration, Instant};

use crate::commands::{escape_json, CommandResult};
use cxhook_core::config::{AppConfig, LoadOptions};
use cxhook_core::{
    decode_response, TagRegistry, WebhookRequest, WebhookResponse, CANCEL_PERIOD_PARAMETER,
};
use serde::Serialize;
use serde_json::{json, Value};

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

fn sample_request() -> Value {
    json!({
        "fulfillmentInfo": { "tag": "confirm" },
        "sessionInfo": {
            "session": "cxhook-smoke",
            "parameters": { "size": "Large", "color": "Blue" }
        }
    })
}

pub fn run(url: &str) -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    let config = match timed_check(|| AppConfig::load(LoadOptions::default())) {
        Ok((elapsed_ms, config)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Pass,
                elapsed_ms,
                message: "configuration loaded and validated".to_string(),
            });
            config
        }
        Err((elapsed_ms, error)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Fail,
                elapsed_ms,
                message: error.to_string(),
            });
            checks.push(skipped("local_fulfillment"));
            checks.push(skipped("webhook_roundtrip"));
            checks.push(skipped("reply_matches"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let sample = sample_request();
    let expected = match timed_check(|| expected_response(&config, &sample)) {
        Ok((elapsed_ms, expected)) => {
            checks.push(SmokeCheck {
                name: "local_fulfillment",
                status: SmokeStatus::Pass,
                elapsed_ms,
                message: "sample confirm request fulfilled locally".to_string(),
            });
            expected
        }
        Err((elapsed_ms, message)) => {
            checks.push(SmokeCheck {
                name: "local_fulfillment",
                status: SmokeStatus::Fail,
                elapsed_ms,
                message,
            });
            checks.push(skipped("webhook_roundtrip"));
            checks.push(skipped("reply_matches"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            checks.push(SmokeCheck {
                name: "webhook_roundtrip",
                status: SmokeStatus::Fail,
                elapsed_ms: 0,
                message: format!("failed to initialize async runtime: {error}"),
            });
            checks.push(skipped("reply_matches"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let roundtrip_started = Instant::now();
    let actual = match runtime.block_on(post_sample(url, &sample)) {
        Ok(actual) => {
            checks.push(SmokeCheck {
                name: "webhook_roundtrip",
                status: SmokeStatus::Pass,
                elapsed_ms: roundtrip_started.elapsed().as_millis() as u64,
                message: format!("`{url}` answered with a decodable response"),
            });
            actual
        }
        Err(message) => {
            checks.push(SmokeCheck {
                name: "webhook_roundtrip",
                status: SmokeStatus::Fail,
                elapsed_ms: roundtrip_started.elapsed().as_millis() as u64,
                message,
            });
            checks.push(skipped("reply_matches"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    checks.push(compare_replies(&expected, &actual));
    finalize_report(checks, started.elapsed().as_millis() as u64)
}

fn expected_response(config: &AppConfig, sample: &Value) -> Result<WebhookResponse, String> {
    let registry =
        TagRegistry::with_defaults(&config.fulfillment).map_err(|error| error.to_string())?;
    let request: WebhookRequest =
        serde_json::from_value(sample.clone()).map_err(|error| error.to_string())?;
    registry.dispatch(&request).map_err(|error| error.to_string())
}

async fn post_sample(url: &str, sample: &Value) -> Result<WebhookResponse, String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|error| format!("failed to build http client: {error}"))?;

    let response = client
        .post(url)
        .json(sample)
        .send()
        .await
        .map_err(|error| format!("request to `{url}` failed: {error}"))?;
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|error| format!("failed to read response body: {error}"))?;

    if !status.is_success() {
        return Err(format!("webhook returned {status}: {}", String::from_utf8_lossy(&body)));
    }

    decode_response(&body).map_err(|error| error.to_string())
}

fn compare_replies(expected: &WebhookResponse, actual: &WebhookResponse) -> SmokeCheck {
    let started = Instant::now();
    let expected_period = expected.output_parameters().get(CANCEL_PERIOD_PARAMETER);
    let actual_period = actual.output_parameters().get(CANCEL_PERIOD_PARAMETER);

    let message = if expected.texts() != actual.texts() {
        Some(format!(
            "reply text mismatch: expected {:?}, got {:?}",
            expected.texts(),
            actual.texts()
        ))
    } else if expected_period != actual_period {
        Some(format!(
            "{CANCEL_PERIOD_PARAMETER} mismatch: expected {expected_period:?}, got {actual_period:?}"
        ))
    } else {
        None
    };

    SmokeCheck {
        name: "reply_matches",
        status: if message.is_some() { SmokeStatus::Fail } else { SmokeStatus::Pass },
        elapsed_ms: started.elapsed().as_millis() as u64,
        message: message.unwrap_or_else(|| "reply text and cancel period match".to_string()),
    }
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((started.elapsed().as_millis() as u64, value)),
        Err(error) => Err((started.elapsed().as_millis() as u64, error)),
    }
}

fn skipped(name: &'static str) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Skipped,
        elapsed_ms: 0,
        message: "skipped due previous failure".to_string(),
    }
}

fn finalize_report(checks: Vec<SmokeCheck>, total_elapsed_ms: u64) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == SmokeStatus::Fail);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"smoke\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            escape_json(&error.to_string())
        )
    });

    CommandResult { exit_code: if failed { 6 } else { 0 }, output: format!("{human}\n{machine}") }
}
