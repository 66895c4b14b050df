use thiserror::Error;

use super::summary::{summary_request, truncate_summary};
use crate::config::{Config, DEFAULT_EXIT_TOKEN, DEFAULT_SUMMARY_LENGTH};
use crate::models::{Message, Role};
use crate::service::{CompletionService, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingRole,
    AwaitingFirstPrompt,
    AwaitingInput,
    AwaitingResponse,
    Terminated,
    Summarized,
}

/// What a line of user input did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDecision {
    /// Blank input; re-prompt
    Rejected,
    /// Exit token before any prompt; nothing to summarize or export
    ExitWithoutTurns,
    /// Exit token after at least one prompt
    Exit,
    /// Appended as a user message; a completion is due
    Prompt,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {operation} while the session is {state:?}")]
    InvalidState { operation: &'static str, state: SessionState },

    #[error("the session has no initial prompt to summarize")]
    NothingToSummarize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub summary_length: usize,
    pub exit_token: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { summary_length: DEFAULT_SUMMARY_LENGTH, exit_token: DEFAULT_EXIT_TOKEN.to_string() }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self { summary_length: config.summary_length, exit_token: config.exit_token.clone() }
    }
}

/// One conversation with a fixed model, from role assignment to summary
#[derive(Debug, Clone)]
pub struct ChatSession {
    model: String,
    history: Vec<Message>,
    initial_prompt: Option<String>,
    summary: Option<String>,
    options: SessionOptions,
    state: SessionState,
    aborted: bool,
}

impl ChatSession {
    pub fn new(model: impl Into<String>, options: SessionOptions) -> Self {
        Self {
            model: model.into(),
            history: Vec::new(),
            initial_prompt: None,
            summary: None,
            options,
            state: SessionState::AwaitingRole,
            aborted: false,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Everything sent to the service, including an unanswered trailing prompt
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn initial_prompt(&self) -> Option<&str> {
        self.initial_prompt.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn summary_length(&self) -> usize {
        self.options.summary_length
    }

    pub fn exit_token(&self) -> &str {
        &self.options.exit_token
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True when a turn failed and the session was cut short
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Number of completed turns
    pub fn turn_count(&self) -> usize {
        self.transcript().iter().filter(|m| m.role == Role::Assistant).count()
    }

    /// History restricted to complete turns
    ///
    /// A user message left unanswered by a failed turn is not part of the transcript.
    pub fn transcript(&self) -> &[Message] {
        match self.history.last() {
            Some(last) if last.role == Role::User => &self.history[..self.history.len() - 1],
            _ => &self.history,
        }
    }

    fn expect_state(
        &self,
        operation: &'static str,
        allowed: &[SessionState],
    ) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::InvalidState { operation, state: self.state })
        }
    }

    /// Set the optional system role; blank text means no role
    pub fn assign_role(&mut self, role: Option<&str>) -> Result<(), SessionError> {
        self.expect_state("assign a role", &[SessionState::AwaitingRole])?;

        if let Some(text) = role.map(str::trim).filter(|t| !t.is_empty()) {
            self.history.push(Message::system(text));
        }
        self.state = SessionState::AwaitingFirstPrompt;
        Ok(())
    }

    /// Apply one line of user input
    pub fn accept_input(&mut self, line: &str) -> Result<InputDecision, SessionError> {
        self.expect_state(
            "accept input",
            &[SessionState::AwaitingFirstPrompt, SessionState::AwaitingInput],
        )?;

        if line.trim().is_empty() {
            return Ok(InputDecision::Rejected);
        }

        if line == self.options.exit_token {
            self.state = SessionState::Terminated;
            return Ok(if self.initial_prompt.is_none() {
                InputDecision::ExitWithoutTurns
            } else {
                InputDecision::Exit
            });
        }

        if self.initial_prompt.is_none() {
            self.initial_prompt = Some(line.to_string());
        }
        self.history.push(Message::user(line));
        self.state = SessionState::AwaitingResponse;
        Ok(InputDecision::Prompt)
    }

    /// Send the full history and append the reply
    ///
    /// A remote failure or a reply not tagged `assistant` terminates the
    /// session; the unanswered prompt stays in
    /// [`history`](Self::history) but is excluded from [`transcript`](Self::transcript).
    pub fn complete_turn<S>(&mut self, service: &S) -> Result<&Message, TurnError>
    where
        S: CompletionService + ?Sized,
    {
        self.expect_state("complete a turn", &[SessionState::AwaitingResponse])?;

        let reply = service.create_completion(&self.model, &self.history).and_then(|reply| {
            if reply.role == Role::Assistant {
                Ok(reply)
            } else {
                Err(ServiceError::ServiceUnavailable(format!(
                    "unexpected reply role: {}",
                    reply.role
                )))
            }
        });

        match reply {
            Ok(reply) => {
                self.history.push(reply);
                self.state = SessionState::AwaitingInput;
                Ok(&self.history[self.history.len() - 1])
            }
            Err(e) => {
                tracing::debug!(error = %e, model = %self.model, "turn failed, session aborted");
                self.state = SessionState::Terminated;
                self.aborted = true;
                Err(TurnError::Service(e))
            }
        }
    }

    /// Produce the bounded summary, exactly once, after the session ended
    ///
    /// If the summarization request fails the initial prompt itself is
    /// truncated instead, so a finished conversation can still be saved.
    pub fn summarize<S>(&mut self, service: &S) -> Result<&str, SessionError>
    where
        S: CompletionService + ?Sized,
    {
        self.expect_state("summarize", &[SessionState::Terminated])?;
        let Some(prompt) = self.initial_prompt.as_deref() else {
            return Err(SessionError::NothingToSummarize);
        };

        let max_chars = self.options.summary_length;
        let request = summary_request(prompt, max_chars);
        let raw = match service.create_completion(&self.model, &request) {
            Ok(reply) => reply.content,
            Err(e) => {
                tracing::warn!(error = %e, "summary request failed, using the initial prompt");
                prompt.to_string()
            }
        };

        let summary = truncate_summary(&raw, max_chars);
        tracing::debug!(summary = %summary, "session summarized");
        self.state = SessionState::Summarized;
        Ok(self.summary.insert(summary).as_str())
    }
}
