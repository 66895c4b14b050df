pub mod commands;
pub mod logging;

pub use commands::{Cli, RunOutcome, chat_and_export, run};
