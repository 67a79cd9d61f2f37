//! Map HTTP outcomes onto the crate's error taxonomy.
//!
//! A response is `InvalidInput` only when the provider rejected the input
//! itself: HTTP 413, or HTTP 400/422 whose `error.code` (or `error.type`)
//! names an input problem such as `context_length_exceeded` or a content
//! filter hit. Any other non-2xx status, including a plain 400 for a
//! malformed request, is a `ProviderError`. Failing to get any response at
//! all is `ProviderUnavailable`.

use crate::Error;
use serde_json::Value;

/// Provider error codes that mean "this input was refused".
const INPUT_REJECTION_CODES: &[&str] = &[
    "context_length_exceeded",
    "string_above_max_length",
    "content_filter",
    "content_policy_violation",
    "invalid_prompt",
];

/// Whether a non-success response means the provider rejected the input.
pub(crate) fn is_input_rejection(status: u16, code: Option<&str>) -> bool {
    match status {
        413 => true,
        400 | 422 => code.is_some_and(|c| INPUT_REJECTION_CODES.contains(&c)),
        _ => false,
    }
}

/// Build the error for a non-2xx response.
pub(crate) fn error_from_status(status: u16, body: &str, retry_after_ms: Option<u32>) -> Error {
    let detail = ProviderDetail::parse(body);
    let code = detail.as_ref().and_then(|d| d.code.as_deref());
    let rejected = is_input_rejection(status, code);
    let message = detail
        .and_then(|d| d.message)
        .unwrap_or_else(|| fallback_message(status, body));
    if rejected {
        Error::InvalidInput {
            status: Some(status),
            message,
        }
    } else {
        Error::ProviderError {
            status: Some(status),
            message,
            retry_after_ms,
        }
    }
}

/// Build the error for a request that never produced a response.
pub(crate) fn error_from_transport(err: reqwest::Error) -> Error {
    let what = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "could not connect to provider"
    } else {
        "request to provider failed"
    };
    Error::unavailable_with_source(what, err)
}

/// Best-effort parsing of `Retry-After`.
///
/// Only the `Retry-After: <seconds>` form is supported.
pub(crate) fn retry_after_ms(raw: Option<&str>) -> Option<u32> {
    let secs: u32 = raw?.trim().parse().ok()?;
    Some(secs.saturating_mul(1000))
}

// OpenAI-style `{"error": {"message": ..., "code": ...}}`, or `{"error": "..."}`.
struct ProviderDetail {
    message: Option<String>,
    code: Option<String>,
}

impl ProviderDetail {
    fn parse(body: &str) -> Option<Self> {
        let v: Value = serde_json::from_str(body).ok()?;
        let err = v.get("error")?;
        let (message, code) = match err {
            Value::String(s) => (Some(s.clone()), None),
            other => {
                let message = other.get("message").and_then(Value::as_str).map(str::to_string);
                let code = ["code", "type"]
                    .iter()
                    .filter_map(|k| other.get(*k).and_then(Value::as_str))
                    .find(|c| INPUT_REJECTION_CODES.contains(c))
                    .or_else(|| other.get("code").and_then(Value::as_str))
                    .map(str::to_string);
                (message, code)
            }
        };
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        Some(Self { message, code })
    }
}

fn fallback_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        // Keep log lines bounded when a proxy returns an HTML error page.
        let snippet: String = body.chars().take(200).collect();
        format!("HTTP {}: {}", status, snippet)
    }
}
