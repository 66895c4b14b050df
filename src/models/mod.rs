//! Data models shared by the chat session, the remote service client and the exporter.
//!
//! - [`Role`] - Speaker of a message (`system`, `user`, `assistant`)
//! - [`Message`] - One role-tagged entry of a conversation transcript
//!
//! Both derive serde so they can be sent to the completion API as-is.

pub mod message;

pub use message::{Message, Role};
