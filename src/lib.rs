//! Chat Ledger - Chat with an OpenAI model and keep the conversation in a spreadsheet
//!
//! This library drives an interactive conversation with a remote chat
//! completions service and appends the finished conversation to an `.xlsx`
//! workbook. It provides:
//!
//! - Discovering the usable models and choosing one from a numbered menu
//! - A chat session state machine (role, turns, exit handling, summary)
//! - Appending sessions to a workbook, one formatted sheet per session,
//!   with detection of workbooks held open by another program
//!
//! # Example
//!
//! ```no_run
//! use chat_ledger::config::Config;
//! use chat_ledger::export::SpreadsheetExporter;
//! use chat_ledger::service::OpenAiClient;
//! use chat_ledger::session::{ChatSession, SessionOptions};
//!
//! let config = Config::from_env()?;
//! let client = OpenAiClient::new(&config)?;
//!
//! let mut session = ChatSession::new("gpt-4o-mini", SessionOptions::from(&config));
//! session.assign_role(None)?;
//! session.accept_input("What is a lifetime in Rust?")?;
//! println!("{}", session.complete_turn(&client)?.content);
//! session.accept_input(&config.exit_token)?;
//! session.summarize(&client)?;
//!
//! SpreadsheetExporter::new(&config.workbook_path).append(&session)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod export;
pub mod models;
pub mod service;
pub mod session;
pub mod terminal;
pub mod viewer;

// Re-export commonly used types
pub use catalog::ModelCatalog;
pub use export::SpreadsheetExporter;
pub use models::{Message, Role};
pub use session::ChatSession;
