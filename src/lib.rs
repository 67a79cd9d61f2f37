//! # simplebot
//!
//! Templated completion functions: bind a system prompt once, then call a chat
//! model with one message at a time.
//!
//! ## Overview
//!
//! A [`SimpleBot`] holds an immutable system prompt and a
//! [`CompletionProvider`]. Calling it sends two messages (the system prompt
//! followed by the caller's input) and returns the provider's text verbatim.
//! There is no chat history, no caching and no retry: one call is one
//! provider request, and concurrent calls on a shared bot are independent.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use simplebot::{ProviderConfig, SimpleBot};
//!
//! fn main() -> simplebot::Result<()> {
//!     let bot = SimpleBot::builder()
//!         .system_prompt("You are an expert blogger. Summarize the post in one sentence.")
//!         .config(ProviderConfig::from_env()?)
//!         .build()?;
//!
//!     let summary = bot.call("Rust 1.0 shipped in May 2015 ...")?;
//!     println!("{}", summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bot`] | `SimpleBot` and its builder |
//! | [`provider`] | Provider trait, closure provider, OpenAI-compatible HTTP provider |
//! | [`config`] | Provider configuration (defaults, YAML, environment) |
//! | [`recorder`] | Optional recording of (input, response) pairs |
//! | [`types`] | Chat message types |

pub mod bot;
pub mod config;
pub mod provider;
pub mod recorder;
pub mod types;

pub use bot::{SimpleBot, SimpleBotBuilder};
pub use config::ProviderConfig;
pub use provider::{CompletionProvider, FnProvider, OpenAiCompatibleProvider};
pub use recorder::{InMemoryRecorder, NoopRecorder, PromptRecord, PromptRecorder};
pub use types::message::{Message, MessageRole};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
