use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::catalog::{ModelCatalog, select_interactive};
use crate::config::{API_KEY_VAR, Config, LEGACY_API_KEY_VAR};
use crate::export::{ExportError, SpreadsheetExporter};
use crate::service::{CompletionService, OpenAiClient, ServiceError};
use crate::session::{
    ChatSession, SessionOptions, SessionOutcome, drive_session, read_role, service_failure,
};
use crate::terminal::{ConsoleTerminal, Terminal};
use crate::viewer::{SystemViewer, Viewer, open_best_effort};

#[derive(Parser)]
#[command(name = "chat-ledger")]
#[command(version = "0.1.0")]
#[command(
    about = "Chat with an OpenAI model and save the conversation to a spreadsheet",
    long_about = "Chat with an OpenAI model and save the conversation to a spreadsheet.\n\n\
                  The API key is read from OPENAI_API_KEY (or API_KEY, also from a .env file). \
                  Each finished conversation is added as a new sheet of chat_history.xlsx."
)]
pub struct Cli {}

/// How a run ended; decides the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Conversation saved to the workbook
    Saved,
    /// The user exited before the first prompt
    NoTurns,
    /// The workbook is open elsewhere; nothing was started
    TargetLocked,
    /// Model listing or a turn failed at the remote service
    ServiceFailed,
    /// The conversation finished but could not be written
    ExportFailed,
}

impl RunOutcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            RunOutcome::Saved | RunOutcome::NoTurns | RunOutcome::TargetLocked => ExitCode::SUCCESS,
            RunOutcome::ServiceFailed | RunOutcome::ExportFailed => ExitCode::FAILURE,
        }
    }
}

pub fn run() -> Result<ExitCode> {
    let _cli = Cli::parse();
    super::logging::init();

    let config = Config::from_env()?;
    let exporter = SpreadsheetExporter::new(&config.workbook_path);
    let mut terminal = ConsoleTerminal::new()?;

    // Checked up front so a finished conversation is not lost at save time
    if exporter.is_target_locked() {
        terminal.error(&ExportError::Locked(exporter.path().to_path_buf()).to_string());
        return Ok(RunOutcome::TargetLocked.exit_code());
    }

    let client = OpenAiClient::new(&config)?;
    let outcome = chat_and_export(&config, &client, &exporter, &mut terminal, &mut SystemViewer)?;
    tracing::debug!(?outcome, "run finished");
    Ok(outcome.exit_code())
}

/// Pick a model, hold the conversation, then save it
///
/// Classified service failures and export failures are reported through
/// `terminal` and returned as an outcome; anything else is an error.
pub fn chat_and_export<S>(
    config: &Config,
    service: &S,
    exporter: &SpreadsheetExporter,
    terminal: &mut dyn Terminal,
    viewer: &mut dyn Viewer,
) -> Result<RunOutcome>
where
    S: CompletionService + ?Sized,
{
    let catalog = match ModelCatalog::fetch(service, &config.model_family) {
        Ok(catalog) => catalog,
        Err(e) => {
            report_service_failure(terminal, &e);
            return Ok(RunOutcome::ServiceFailed);
        }
    };

    terminal.info(&format!(
        "Starting a chat with the AI assistant. Enter {} to finish the chat.",
        config.exit_token
    ));
    let role = read_role(terminal)?;
    let model = select_interactive(&catalog, &config.default_model, terminal)?;
    tracing::info!(model = %model, "model selected");

    let mut session = ChatSession::new(model, SessionOptions::from(config));
    session.assign_role(role.as_deref())?;

    match drive_session(&mut session, service, terminal) {
        Ok(SessionOutcome::NoTurns) => return Ok(RunOutcome::NoTurns),
        Ok(SessionOutcome::Completed) => {}
        Err(e) => {
            let Some(failure) = service_failure(&e) else {
                return Err(e);
            };
            report_service_failure(terminal, failure);
            return Ok(RunOutcome::ServiceFailed);
        }
    }

    session.summarize(service)?;

    match exporter.append(&session) {
        Ok(sheet) => {
            terminal.info(&format!(
                "Saved the conversation to {} (sheet '{}').",
                exporter.path().display(),
                sheet
            ));
            open_best_effort(viewer, exporter.path());
            Ok(RunOutcome::Saved)
        }
        Err(ExportError::Workbook(e)) => {
            terminal.error(&format!("Could not save the conversation: {:#}", e));
            Ok(RunOutcome::ExportFailed)
        }
        Err(e) => {
            terminal.error(&e.to_string());
            Ok(RunOutcome::ExportFailed)
        }
    }
}

fn report_service_failure(terminal: &mut dyn Terminal, err: &ServiceError) {
    terminal.error(&err.diagnostic());
    if err.is_fatal_to_run() {
        terminal.error(&format!(
            "Set {} (or {}) to a valid key, then start again.",
            API_KEY_VAR, LEGACY_API_KEY_VAR
        ));
    }
}
