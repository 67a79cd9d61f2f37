use thiserror::Error;

/// Structured error context for configuration failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.base_url")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "simple_bot", "provider_config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for bots and providers.
///
/// The four headline variants are the whole taxonomy a caller of
/// [`SimpleBot::call`](crate::SimpleBot::call) has to handle; `Io` and `Yaml`
/// only come out of configuration loading.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {message}{}", format_context(.context))]
    InvalidConfiguration {
        message: String,
        context: ErrorContext,
    },

    #[error("Provider unavailable: {message}")]
    ProviderUnavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Provider error{}: {message}", format_status(.status))]
    ProviderError {
        status: Option<u16>,
        message: String,
        retry_after_ms: Option<u32>,
    },

    #[error("Input rejected by provider{}: {message}", format_status(.status))]
    InvalidInput {
        status: Option<u16>,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML syntax error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn format_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl Error {
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::InvalidConfiguration {
            message: msg.into(),
            context,
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Error::ProviderUnavailable {
            message: msg.into(),
            source: None,
        }
    }

    pub fn unavailable_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::ProviderUnavailable {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Error::ProviderError {
            status: None,
            message: msg.into(),
            retry_after_ms: None,
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput {
            status: None,
            message: msg.into(),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::InvalidConfiguration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// HTTP status reported by the provider, when the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::ProviderError { status, .. } | Error::InvalidInput { status, .. } => *status,
            _ => None,
        }
    }

    /// Short stable name of the error class, suitable for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidConfiguration { .. } => "invalid_configuration",
            Error::ProviderUnavailable { .. } => "provider_unavailable",
            Error::ProviderError { .. } => "provider_error",
            Error::InvalidInput { .. } => "invalid_input",
            Error::Io(_) => "io",
            Error::Yaml(_) => "yaml",
        }
    }
}
