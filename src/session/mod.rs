//! Chat session lifecycle
//!
//! A [`ChatSession`] moves through `AwaitingRole → AwaitingFirstPrompt →
//! AwaitingInput ⇄ AwaitingResponse → Terminated → Summarized`.
//! The state machine itself lives in `state`; `driver` runs it against a
//! [`Terminal`](crate::terminal::Terminal) and `summary` holds the
//! summarization request and its truncation rule.
//!
//! Exit policy: if the very first non-blank input is the exit token the
//! session ends with no turns and is never summarized or exported. Later, the
//! exit token ends the loop and summarization follows.

pub mod driver;
pub mod state;
pub mod summary;

pub use driver::{SessionOutcome, drive_session, read_role, service_failure};
pub use state::{ChatSession, InputDecision, SessionError, SessionOptions, SessionState, TurnError};
pub use summary::{TRUNCATION_MARKER, truncate_summary};
