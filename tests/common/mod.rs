//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chat_ledger::models::Message;
use chat_ledger::service::{CompletionService, ServiceError};
use chat_ledger::session::{ChatSession, SessionOptions};
use chat_ledger::terminal::Terminal;
use chat_ledger::viewer::Viewer;
use tempfile::TempDir;

/// Completion service that answers from a script and records every request
pub struct ScriptedService {
    models: Result<Vec<String>, ServiceError>,
    replies: RefCell<VecDeque<Result<Message, ServiceError>>>,
    requests: RefCell<Vec<Vec<Message>>>,
}

impl ScriptedService {
    /// Create a service offering a few typical models and no scripted replies
    pub fn new() -> Self {
        Self {
            models: Ok(vec![
                "gpt-4o".to_string(),
                "whisper-1".to_string(),
                "gpt-3.5-turbo".to_string(),
                "text-embedding-3-small".to_string(),
            ]),
            replies: RefCell::new(VecDeque::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Make model listing fail
    pub fn failing_models(mut self, error: ServiceError) -> Self {
        self.models = Err(error);
        self
    }

    /// Queue an assistant reply
    pub fn reply(self, content: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(Message::assistant(content)));
        self
    }

    /// Queue a failed completion
    pub fn fail(self, error: ServiceError) -> Self {
        self.replies.borrow_mut().push_back(Err(error));
        self
    }

    /// All completion requests received so far
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.borrow().clone()
    }
}

impl Default for ScriptedService {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionService for ScriptedService {
    fn list_models(&self) -> Result<Vec<String>, ServiceError> {
        self.models.clone()
    }

    fn create_completion(
        &self,
        _model: &str,
        messages: &[Message],
    ) -> Result<Message, ServiceError> {
        self.requests.borrow_mut().push(messages.to_vec());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ServiceError::ServiceUnavailable("script exhausted".to_string()))
            })
    }
}

/// Terminal that replays scripted input lines and records all output
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    input: VecDeque<String>,
    pub prompts: Vec<String>,
    pub replies: Vec<String>,
    pub infos: Vec<String>,
    pub errors: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { input: lines.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    /// Lines not consumed yet
    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl Terminal for ScriptedTerminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.input.pop_front())
    }

    fn show_reply(&mut self, content: &str) {
        self.replies.push(content.to_string());
    }

    fn info(&mut self, text: &str) {
        self.infos.push(text.to_string());
    }

    fn error(&mut self, text: &str) {
        self.errors.push(text.to_string());
    }
}

/// Viewer that only records what it was asked to open
#[derive(Default)]
pub struct RecordingViewer {
    pub opened: Vec<PathBuf>,
}

impl Viewer for RecordingViewer {
    fn open(&mut self, path: &Path) -> Result<()> {
        self.opened.push(path.to_path_buf());
        Ok(())
    }
}

/// Scratch directory holding the workbook under test
pub struct WorkbookDir {
    temp_dir: TempDir,
}

impl WorkbookDir {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn workbook(&self) -> PathBuf {
        self.temp_dir.path().join("chat_history.xlsx")
    }
}

impl Default for WorkbookDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a finished, summarized session from alternating prompts and replies
pub fn finished_session(role: Option<&str>, turns: &[(&str, &str)], summary: &str) -> ChatSession {
    let mut service = ScriptedService::new();
    for (_, reply) in turns {
        service = service.reply(reply);
    }
    service = service.reply(summary);

    let options = SessionOptions { summary_length: 100, ..SessionOptions::default() };
    let mut session = ChatSession::new("gpt-test", options);
    session.assign_role(role).expect("role");
    for (prompt, _) in turns {
        session.accept_input(prompt).expect("prompt");
        session.complete_turn(&service).expect("turn");
    }
    session.accept_input("exit()").expect("exit");
    session.summarize(&service).expect("summary");
    session
}

/// Read every (role, content) row below the header of a sheet
pub fn read_rows(sheet: &umya_spreadsheet::Worksheet) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    let mut row: u32 = 3;
    loop {
        let role = sheet.get_value((1, row));
        if role.is_empty() {
            break;
        }
        rows.push((role, sheet.get_value((2, row))));
        row += 1;
    }
    rows
}

/// Sheet titles of a saved workbook, in tab order
pub fn sheet_names(path: &Path) -> Vec<String> {
    let book = umya_spreadsheet::reader::xlsx::read(path).expect("Failed to read workbook");
    book.get_sheet_collection().iter().map(|s| s.get_name().to_string()).collect()
}
