//! Templated completion functions.
//!
//! A [`SimpleBot`] is primed with a system prompt once and then called with
//! one human message at a time. Each call sends exactly two messages to the
//! provider (the system prompt, then the caller's input) and returns the
//! provider's text untouched. The bot keeps no chat history.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ProviderConfig;
use crate::error::ErrorContext;
use crate::provider::{CompletionProvider, OpenAiCompatibleProvider};
use crate::recorder::{noop_recorder, PromptRecord, PromptRecorder};
use crate::types::message::Message;
use crate::{Error, Result};

/// A system prompt bound to a completion provider.
///
/// Immutable after construction, so one bot can be shared freely between
/// threads and called concurrently.
pub struct SimpleBot {
    system_prompt: String,
    provider: Arc<dyn CompletionProvider>,
    recorder: Arc<dyn PromptRecorder>,
}

impl std::fmt::Debug for SimpleBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleBot")
            .field("system_prompt", &self.system_prompt)
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl SimpleBot {
    /// Bind `system_prompt` to `provider`.
    ///
    /// Fails with [`Error::InvalidConfiguration`] when the prompt is empty or
    /// whitespace-only. The prompt is otherwise stored exactly as given.
    pub fn new(
        system_prompt: impl Into<String>,
        provider: impl CompletionProvider + 'static,
    ) -> Result<Self> {
        SimpleBotBuilder::new()
            .system_prompt(system_prompt)
            .provider(Arc::new(provider))
            .build()
    }

    pub fn builder() -> SimpleBotBuilder {
        SimpleBotBuilder::new()
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The exact message sequence a call with `input` sends.
    pub fn messages_for(&self, input: &str) -> [Message; 2] {
        [Message::system(self.system_prompt.as_str()), Message::user(input)]
    }

    /// Send `input` under the bound system prompt and return the response.
    ///
    /// One provider request per call; no retries and no caching. Provider
    /// failures are returned as-is.
    pub fn call(&self, input: &str) -> Result<String> {
        let invocation_id = Uuid::new_v4();
        let messages = self.messages_for(input);

        debug!(
            invocation_id = %invocation_id,
            provider = self.provider.name(),
            input_len = input.len(),
            "invoking simple bot"
        );

        let response = match self.provider.complete(&messages) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    invocation_id = %invocation_id,
                    provider = self.provider.name(),
                    kind = e.kind(),
                    error = %e,
                    "simple bot invocation failed"
                );
                return Err(e);
            }
        };

        if let Err(e) = self
            .recorder
            .record(PromptRecord::new(input, response.as_str()))
        {
            warn!(invocation_id = %invocation_id, error = %e, "failed to record prompt");
        }

        debug!(
            invocation_id = %invocation_id,
            output_len = response.len(),
            "simple bot invocation finished"
        );
        Ok(response)
    }
}

/// Builder for [`SimpleBot`].
///
/// Without an explicit provider, `build` creates an
/// [`OpenAiCompatibleProvider`] from the configured [`ProviderConfig`]
/// (or its defaults).
pub struct SimpleBotBuilder {
    system_prompt: Option<String>,
    config: Option<ProviderConfig>,
    provider: Option<Arc<dyn CompletionProvider>>,
    recorder: Arc<dyn PromptRecorder>,
}

impl SimpleBotBuilder {
    pub fn new() -> Self {
        Self {
            system_prompt: None,
            config: None,
            provider: None,
            recorder: noop_recorder(),
        }
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Provider settings, passed through to the default HTTP provider.
    ///
    /// Ignored when an explicit provider is set.
    pub fn config(mut self, config: ProviderConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Inject a prompt recorder. Default is a no-op recorder.
    pub fn recorder(mut self, recorder: Arc<dyn PromptRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn build(self) -> Result<SimpleBot> {
        let system_prompt = self.system_prompt.unwrap_or_default();
        if system_prompt.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "system prompt must not be empty or whitespace-only",
                ErrorContext::new()
                    .with_field_path("system_prompt")
                    .with_source("simple_bot"),
            ));
        }

        let provider = match self.provider {
            Some(p) => p,
            None => {
                let config = self.config.unwrap_or_default();
                Arc::new(OpenAiCompatibleProvider::new(config)?) as Arc<dyn CompletionProvider>
            }
        };

        Ok(SimpleBot {
            system_prompt,
            provider,
            recorder: self.recorder,
        })
    }
}

impl Default for SimpleBotBuilder {
    fn default() -> Self {
        Self::new()
    }
}
