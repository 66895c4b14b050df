//! Line-oriented user interaction
//!
//! [`Terminal`] is the seam between the interactive loops and the console.
//! [`ConsoleTerminal`] reads through rustyline and prints colored output.

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

pub trait Terminal {
    /// Read one line. `None` means the input ended (Ctrl-D / Ctrl-C).
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Show an assistant reply as it arrives
    fn show_reply(&mut self, content: &str);

    /// Plain informational text
    fn info(&mut self, text: &str);

    /// Validation or failure diagnostics
    fn error(&mut self, text: &str);
}

/// Interactive console backed by rustyline
pub struct ConsoleTerminal {
    editor: DefaultEditor,
}

impl ConsoleTerminal {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to initialize line editor")?;
        Ok(Self { editor })
    }
}

impl Terminal for ConsoleTerminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    // History is a convenience only
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(e) => Err(e).context("Failed to read input"),
        }
    }

    fn show_reply(&mut self, content: &str) {
        println!("\n{} {}", "Assistant:".green(), content);
    }

    fn info(&mut self, text: &str) {
        println!("{}", text);
    }

    fn error(&mut self, text: &str) {
        eprintln!("{}", text.red());
    }
}

/// Terminal that replays scripted input lines and records all output
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedTerminal {
    input: std::collections::VecDeque<String>,
    pub prompts: Vec<String>,
    pub replies: Vec<String>,
    pub infos: Vec<String>,
    pub errors: Vec<String>,
}

#[cfg(test)]
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

#[cfg(test)]
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
