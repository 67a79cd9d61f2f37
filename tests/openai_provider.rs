//! HTTP-level tests for the OpenAI-compatible provider against a mock server.

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use simplebot::{
    CompletionProvider, Error, Message, OpenAiCompatibleProvider, ProviderConfig, SimpleBot,
};

const CHAT_PATH: &str = "/v1/chat/completions";

fn config_for(server: &ServerGuard) -> ProviderConfig {
    ProviderConfig::new("gpt-4o-mini")
        .with_base_url(format!("{}/v1", server.url()))
        .with_api_key("sk-test")
        .with_timeout_secs(5)
}

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
    })
    .to_string()
}

#[test]
fn test_bot_call_round_trip_over_http() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", CHAT_PATH)
        .match_header("authorization", "Bearer sk-test")
        .match_header("x-request-id", Matcher::Any)
        .match_body(Matcher::Json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "You are an expert blogger."},
                {"role": "user", "content": "My post about Rust."}
            ],
            "temperature": 0.0,
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("Five titles:\n1. Rust"))
        .expect(1)
        .create();

    let bot = SimpleBot::builder()
        .system_prompt("You are an expert blogger.")
        .config(config_for(&server))
        .build()
        .unwrap();

    let out = bot.call("My post about Rust.").unwrap();
    assert_eq!(out, "Five titles:\n1. Rust");
    mock.assert();
}

#[test]
fn test_pass_through_options_reach_the_wire() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", CHAT_PATH)
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o",
            "temperature": 0.4,
            "max_tokens": 64,
            "response_format": {"type": "json_object"},
            "seed": 11
        })))
        .with_status(200)
        .with_body(completion_body("{\"ok\":true}"))
        .create();

    let mut config = config_for(&server)
        .with_temperature(0.4)
        .with_max_tokens(64)
        .with_json_mode(true)
        .with_extra("seed", json!(11));
    config.model = "gpt-4o".into();
    let provider = OpenAiCompatibleProvider::new(config).unwrap();

    let out = provider
        .complete(&[
            Message::system("Reply in JSON."),
            Message::user("hi"),
        ])
        .unwrap();
    assert_eq!(out, "{\"ok\":true}");
    mock.assert();
}

#[test]
fn test_no_auth_header_without_api_key() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", CHAT_PATH)
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(completion_body("local model says hi"))
        .create();

    let mut config = config_for(&server);
    config.api_key = None;
    let bot = SimpleBot::builder()
        .system_prompt("sys")
        .config(config)
        .build()
        .unwrap();

    assert_eq!(bot.call("hello").unwrap(), "local model says hi");
    mock.assert();
}

#[test]
fn test_rate_limit_is_provider_error_with_retry_after() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", CHAT_PATH)
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_header("retry-after", "60")
        .with_body(r#"{"error":{"message":"Rate limit exceeded","type":"rate_limit_error"}}"#)
        .expect(1)
        .create();

    let bot = SimpleBot::builder()
        .system_prompt("sys")
        .config(config_for(&server))
        .build()
        .unwrap();

    match bot.call("hello").unwrap_err() {
        Error::ProviderError {
            status,
            message,
            retry_after_ms,
        } => {
            assert_eq!(status, Some(429));
            assert_eq!(message, "Rate limit exceeded");
            assert_eq!(retry_after_ms, Some(60_000));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // No retry: exactly one request.
    mock.assert();
}

#[test]
fn test_error_classification_by_status() {
    let plain = r#"{"error":{"message":"Test error"}}"#;
    let too_long = r#"{"error":{"message":"Test error","code":"context_length_exceeded"}}"#;
    let cases = [
        (400u16, plain, "provider_error"),
        (400, too_long, "invalid_input"),
        (401, plain, "provider_error"),
        (403, plain, "provider_error"),
        (413, plain, "invalid_input"),
        (422, plain, "provider_error"),
        (422, too_long, "invalid_input"),
        (500, plain, "provider_error"),
        (503, too_long, "provider_error"),
    ];

    for (status, body, expected_kind) in cases {
        let mut server = Server::new();
        let _mock = server
            .mock("POST", CHAT_PATH)
            .with_status(status as usize)
            .with_body(body)
            .create();

        let provider = OpenAiCompatibleProvider::new(config_for(&server)).unwrap();
        let err = provider
            .complete(&[Message::user("x")])
            .unwrap_err();
        assert_eq!(err.kind(), expected_kind, "status {}", status);
        assert_eq!(err.status(), Some(status));
    }
}

#[test]
fn test_reserved_extra_keys_fail_before_any_request() {
    let mut server = Server::new();
    let mock = server.mock("POST", CHAT_PATH).expect(0).create();

    let config = config_for(&server)
        .with_extra("messages", json!([]))
        .with_extra("stream", json!(true));
    let err = SimpleBot::builder()
        .system_prompt("sys")
        .config(config)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { .. }));
    assert_eq!(
        err.context().unwrap().field_path.as_deref(),
        Some("config.extra.messages")
    );
    mock.assert();
}

#[test]
fn test_success_without_content_is_provider_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", CHAT_PATH)
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create();

    let provider = OpenAiCompatibleProvider::new(config_for(&server)).unwrap();
    let err = provider
        .complete(&[Message::user("x")])
        .unwrap_err();
    assert!(matches!(err, Error::ProviderError { status: None, .. }));
}

#[test]
fn test_non_json_success_body_is_provider_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", CHAT_PATH)
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create();

    let provider = OpenAiCompatibleProvider::new(config_for(&server)).unwrap();
    let err = provider
        .complete(&[Message::user("x")])
        .unwrap_err();
    assert!(matches!(err, Error::ProviderError { .. }));
}

#[test]
fn test_unreachable_provider_is_unavailable() {
    // Port 1 on loopback is not listening in any sane test environment.
    let config = ProviderConfig::new("gpt-4o-mini")
        .with_base_url("http://127.0.0.1:1/v1")
        .with_timeout_secs(2);
    let bot = SimpleBot::builder()
        .system_prompt("sys")
        .config(config)
        .build()
        .unwrap();

    let err = bot.call("hello").unwrap_err();
    assert!(
        matches!(err, Error::ProviderUnavailable { .. }),
        "unexpected error: {:?}",
        err
    );
}
