//! Core data types exchanged between bots and completion providers.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Chat message with role and text content |
//! | [`MessageRole`] | Message role (system, user, assistant) |
//!
//! ```rust
//! use simplebot::types::{Message, MessageRole};
//!
//! let system = Message::system("You are a helpful assistant");
//! let user = Message::user("Summarize this post.");
//! assert_eq!(system.role, MessageRole::System);
//! assert_eq!(user.content, "Summarize this post.");
//! ```

pub mod message;

pub use message::{Message, MessageRole};
