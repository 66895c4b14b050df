use anyhow::Result;
use colored::Colorize;

use super::state::{ChatSession, InputDecision, TurnError};
use crate::service::{CompletionService, ServiceError};
use crate::terminal::Terminal;

/// How the turn loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The exit token was the first thing entered; nothing to keep
    NoTurns,
    /// At least one prompt was entered and the user exited cleanly
    Completed,
}

/// Ask for the optional system role
///
/// Blank input and end of input both mean "no role".
pub fn read_role(terminal: &mut dyn Terminal) -> Result<Option<String>> {
    let role = terminal.read_line(
        "If you want the assistant to play a role, describe it. Otherwise just press Enter: ",
    )?;
    Ok(role.filter(|r| !r.trim().is_empty()))
}

/// Run the turn loop until the user exits
///
/// Each reply is shown as it arrives. A failed turn is returned as the
/// classified [`ServiceError`]; the session is left terminated and nothing is
/// retried. End of input counts as the exit token.
pub fn drive_session<S>(
    session: &mut ChatSession,
    service: &S,
    terminal: &mut dyn Terminal,
) -> Result<SessionOutcome>
where
    S: CompletionService + ?Sized,
{
    let prompt = format!("\n{} ", "You:".cyan());

    loop {
        let line = match terminal.read_line(&prompt)? {
            Some(line) => line,
            None => session.exit_token().to_string(),
        };

        match session.accept_input(&line)? {
            InputDecision::Rejected => continue,
            InputDecision::ExitWithoutTurns => return Ok(SessionOutcome::NoTurns),
            InputDecision::Exit => {
                tracing::info!(turns = session.turn_count(), "session finished");
                return Ok(SessionOutcome::Completed);
            }
            InputDecision::Prompt => {}
        }

        match session.complete_turn(service) {
            Ok(reply) => terminal.show_reply(&reply.content),
            Err(TurnError::Service(e)) => return Err(anyhow::Error::new(e)),
            Err(TurnError::Session(e)) => return Err(e.into()),
        }
    }
}

/// Find the classified service failure behind a session error, if any
pub fn service_failure(err: &anyhow::Error) -> Option<&ServiceError> {
    err.downcast_ref::<ServiceError>()
}
