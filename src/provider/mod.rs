//! Completion provider abstraction.
//!
//! A provider turns an ordered message sequence into generated text. Bots only
//! ever talk to this trait, so the same bot code works against the bundled
//! [`OpenAiCompatibleProvider`], a closure in a test, or any custom backend.

pub mod classify;
pub mod openai;

use std::fmt;
use std::sync::Arc;

use crate::types::message::Message;
use crate::Result;

pub use openai::OpenAiCompatibleProvider;

/// Blocking chat-completion backend.
///
/// Implementations must not retry or cache: one `complete` call is one
/// request to the underlying service.
pub trait CompletionProvider: Send + Sync + fmt::Debug {
    /// Short identifier used in logs (e.g. `"openai-compatible"`).
    fn name(&self) -> &str;

    /// Send `messages` and return the generated text verbatim.
    fn complete(&self, messages: &[Message]) -> Result<String>;
}

impl<P: CompletionProvider + ?Sized> CompletionProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn complete(&self, messages: &[Message]) -> Result<String> {
        (**self).complete(messages)
    }
}

impl<P: CompletionProvider + ?Sized> CompletionProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn complete(&self, messages: &[Message]) -> Result<String> {
        (**self).complete(messages)
    }
}

/// Provider backed by a plain function or closure.
///
/// Handy for tests and for wiring in backends that already expose a
/// "messages in, text out" function.
pub struct FnProvider<F> {
    name: String,
    f: F,
}

impl<F> FnProvider<F>
where
    F: Fn(&[Message]) -> Result<String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProvider").field("name", &self.name).finish()
    }
}

impl<F> CompletionProvider for FnProvider<F>
where
    F: Fn(&[Message]) -> Result<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn complete(&self, messages: &[Message]) -> Result<String> {
        (self.f)(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_fn_provider_forwards_messages() {
        let p = FnProvider::new("concat", |msgs: &[Message]| {
            Ok(msgs
                .iter()
                .map(|m| format!("{}={}", m.role, m.content))
                .collect::<Vec<_>>()
                .join(";"))
        });
        let out = p
            .complete(&[Message::system("s"), Message::user("u")])
            .unwrap();
        assert_eq!(out, "system=s;user=u");
        assert_eq!(p.name(), "concat");
    }

    #[test]
    fn test_shared_provider_delegates() {
        let p: Arc<dyn CompletionProvider> = Arc::new(FnProvider::new("fails", |_: &[Message]| {
            Err(Error::unavailable("down"))
        }));
        assert_eq!(p.name(), "fails");
        assert!(matches!(
            p.complete(&[]),
            Err(Error::ProviderUnavailable { .. })
        ));
    }

    #[test]
    fn test_debug_shows_name_only() {
        let p = FnProvider::new("quiet", |_: &[Message]| Ok(String::new()));
        assert_eq!(format!("{:?}", p), r#"FnProvider { name: "quiet" }"#);
    }
}
