//! OpenAI-compatible chat-completions provider.
//!
//! Works for any endpoint speaking the `/chat/completions` JSON format
//! (OpenAI, DeepSeek, Mistral, Groq, a local Ollama or vLLM server, ...).

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use super::classify;
use super::CompletionProvider;
use crate::config::ProviderConfig;
use crate::error::ErrorContext;
use crate::types::message::Message;
use crate::{Error, Result};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Blocking HTTP provider for OpenAI-style chat completions.
pub struct OpenAiCompatibleProvider {
    client: reqwest::blocking::Client,
    config: ProviderConfig,
    endpoint: String,
}

impl std::fmt::Debug for OpenAiCompatibleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleProvider")
            .field("endpoint", &self.endpoint)
            .field("config", &self.config)
            .finish()
    }
}

impl OpenAiCompatibleProvider {
    /// Validate `config` and build the HTTP client.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                Error::configuration_with_context(
                    "failed to build HTTP client",
                    ErrorContext::new()
                        .with_details(e.to_string())
                        .with_source("openai_provider"),
                )
            })?;

        let endpoint = config.chat_completions_url();
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request body for `messages` under this provider's configuration.
    pub fn build_request_body(&self, messages: &[Message]) -> Value {
        let oai_messages: Vec<Value> = messages
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let mut body = json!({
            "model": self.config.model,
            "messages": oai_messages,
            "temperature": self.config.temperature,
            "stream": false,
        });

        if let Some(mt) = self.config.max_tokens {
            body["max_tokens"] = json!(mt);
        }
        if self.config.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }
        for (k, v) in &self.config.extra {
            body[k.as_str()] = v.clone();
        }
        body
    }

    /// Extract the generated text from a successful response body.
    pub fn parse_response(body: &Value) -> Result<String> {
        if let Some(content) = body
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
        {
            return Ok(content.to_string());
        }

        // Some gateways answer 200 with an error envelope.
        if let Some(err) = body.get("error") {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| err.as_str())
                .unwrap_or("provider returned an error object");
            return Err(Error::provider(message));
        }

        Err(Error::provider("response contained no message content"))
    }
}

impl CompletionProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    fn complete(&self, messages: &[Message]) -> Result<String> {
        let request_id = Uuid::new_v4().to_string();
        let body = self.build_request_body(messages);

        debug!(
            request_id = %request_id,
            model = %self.config.model,
            endpoint = %self.endpoint,
            messages = messages.len(),
            "sending chat completion request"
        );

        let mut req = self
            .client
            .post(&self.endpoint)
            .header(REQUEST_ID_HEADER, &request_id)
            .json(&body);
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().map_err(classify::error_from_transport)?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().map_err(classify::error_from_transport)?;

        debug!(
            request_id = %request_id,
            status = status.as_u16(),
            bytes = text.len(),
            "received chat completion response"
        );

        if !status.is_success() {
            return Err(classify::error_from_status(
                status.as_u16(),
                &text,
                classify::retry_after_ms(retry_after.as_deref()),
            ));
        }

        let json: Value = serde_json::from_str(&text)
            .map_err(|e| Error::provider(format!("response is not valid JSON: {}", e)))?;
        Self::parse_response(&json)
    }
}
