//! Provider configuration bundle.
//!
//! A [`ProviderConfig`] is built once (defaults, YAML file, or environment)
//! and handed to the provider at construction time. Nothing here is global:
//! reading the environment is an explicit, one-shot step.

use crate::error::ErrorContext;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Request-body keys owned by the provider; `extra` may not set them.
pub const RESERVED_EXTRA_KEYS: &[&str] = &["model", "messages", "stream"];

pub const ENV_MODEL: &str = "SIMPLEBOT_MODEL";
pub const ENV_TEMPERATURE: &str = "SIMPLEBOT_TEMPERATURE";
pub const ENV_MAX_TOKENS: &str = "SIMPLEBOT_MAX_TOKENS";
pub const ENV_BASE_URL: &str = "SIMPLEBOT_BASE_URL";
pub const ENV_API_KEY: &str = "SIMPLEBOT_API_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "SIMPLEBOT_HTTP_TIMEOUT_SECS";
pub const ENV_JSON_MODE: &str = "SIMPLEBOT_JSON_MODE";

/// Settings passed through to the completion provider.
///
/// The bot never interprets these; they shape the provider request only.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub model: String,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Ask the provider for a JSON object response.
    pub json_mode: bool,
    /// Extra request-body keys, merged verbatim into every request.
    /// Must not contain any of [`RESERVED_EXTRA_KEYS`].
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            json_mode: false,
            extra: BTreeMap::new(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("json_mode", &self.json_mode)
            .field("extra", &self.extra)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, t: f64) -> Self {
        self.temperature = t;
        self
    }

    pub fn with_max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_json_mode(mut self, enable: bool) -> Self {
        self.json_mode = enable;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|k| std::env::var(k).ok())
    }

    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Overlay values found through `lookup` (usually `std::env::var`).
    ///
    /// Blank values are ignored. Values that fail to parse are an error
    /// rather than silently falling back to the previous setting.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get(ENV_MODEL) {
            self.model = v;
        }
        if let Some(v) = get(ENV_TEMPERATURE) {
            self.temperature = parse_env(ENV_TEMPERATURE, &v)?;
        }
        if let Some(v) = get(ENV_MAX_TOKENS) {
            self.max_tokens = Some(parse_env(ENV_MAX_TOKENS, &v)?);
        }
        if let Some(v) = get(ENV_BASE_URL) {
            self.base_url = v;
        }
        if let Some(v) = get(ENV_API_KEY).or_else(|| get(ENV_OPENAI_API_KEY)) {
            self.api_key = Some(v);
        }
        if let Some(v) = get(ENV_TIMEOUT_SECS) {
            self.timeout_secs = parse_env(ENV_TIMEOUT_SECS, &v)?;
        }
        if let Some(v) = get(ENV_JSON_MODE) {
            self.json_mode = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(config_error("model must not be blank", "config.model", None));
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(config_error(
                "temperature out of range",
                "config.temperature",
                Some(format!("expected 0.0..=2.0, got {}", self.temperature)),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(config_error(
                "timeout must be at least one second",
                "config.timeout_secs",
                None,
            ));
        }
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            config_error(
                "base_url is not a valid URL",
                "config.base_url",
                Some(format!("{}: {}", self.base_url, e)),
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(config_error(
                "base_url must use http or https",
                "config.base_url",
                Some(self.base_url.clone()),
            ));
        }
        if let Some(key) = self
            .extra
            .keys()
            .find(|k| RESERVED_EXTRA_KEYS.contains(&k.as_str()))
        {
            return Err(config_error(
                "extra options cannot override a reserved request field",
                &format!("config.extra.{}", key),
                Some(format!("reserved fields: {}", RESERVED_EXTRA_KEYS.join(", "))),
            ));
        }
        Ok(())
    }

    /// Full URL of the chat-completions endpoint.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.parse::<T>().map_err(|e| {
        config_error(
            format!("cannot parse environment variable {}", key),
            key,
            Some(format!("{:?}: {}", raw, e)),
        )
    })
}

fn config_error(msg: impl Into<String>, field: &str, details: Option<String>) -> Error {
    let mut ctx = ErrorContext::new()
        .with_field_path(field)
        .with_source("provider_config");
    if let Some(d) = details {
        ctx = ctx.with_details(d);
    }
    Error::configuration_with_context(msg, ctx)
}
