//! Append finished chat sessions to an `.xlsx` workbook
//!
//! Each session becomes one sheet titled after its summary. A fresh workbook
//! reuses its default sheet; an existing workbook gets a new left-most sheet.
//! See [`layout`] for the cell layout every sheet follows.
//!
//! # Concurrent access
//!
//! Exclusivity is advisory. [`SpreadsheetExporter::is_target_locked`] should be
//! checked before a session starts so a finished conversation is not lost to
//! a write failure, but no lock is held for the duration of the session: a
//! writer that appears between the check and the save is only detected at
//! save time, where the save fails without touching the existing file.

pub mod layout;
pub mod lock;
pub mod sheet_name;
pub mod workbook;

use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::session::ChatSession;
pub use layout::CellRef;
pub use sheet_name::sanitize_sheet_name;
use workbook::WorkbookStore;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{} is open in another program; close it and try again", .0.display())]
    Locked(PathBuf),

    #[error("the session has not been summarized yet")]
    NotSummarized,

    #[error(transparent)]
    Workbook(#[from] anyhow::Error),
}

pub struct SpreadsheetExporter {
    path: PathBuf,
}

impl SpreadsheetExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the workbook exists and another process holds it open for writing
    pub fn is_target_locked(&self) -> bool {
        lock::is_locked(&self.path)
    }

    /// Write the session's transcript as a new sheet and save the workbook
    ///
    /// Returns the title the sheet was saved under, which differs from the
    /// sanitized summary when that title was already taken.
    pub fn append(&self, session: &ChatSession) -> Result<String, ExportError> {
        let summary = session.summary().ok_or(ExportError::NotSummarized)?;
        if self.is_target_locked() {
            return Err(ExportError::Locked(self.path.clone()));
        }

        let mut store = WorkbookStore::open_or_create(&self.path)?;
        let title = sanitize_sheet_name(summary);
        let timestamp = Local::now().format(layout::TIMESTAMP_FORMAT).to_string();

        let sheet = if store.is_new() {
            store.claim_default_sheet(&title)?
        } else {
            store.insert_front_sheet(&title)?
        };
        layout::write_transcript(sheet, &timestamp, session.transcript());
        let saved_title = sheet.get_name().to_string();

        store.save_atomic(&self.path).map_err(|e| {
            if self.is_target_locked() { ExportError::Locked(self.path.clone()) } else { e.into() }
        })?;

        tracing::info!(
            path = %self.path.display(),
            sheet = %saved_title,
            messages = session.transcript().len(),
            "session exported"
        );
        Ok(saved_title)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::session::SessionOptions;

    #[test]
    fn test_unsummarized_session_rejected() {
        let dir = TempDir::new().unwrap();
        let exporter = SpreadsheetExporter::new(dir.path().join("out.xlsx"));
        let session = ChatSession::new("gpt-test", SessionOptions::default());

        assert!(matches!(exporter.append(&session), Err(ExportError::NotSummarized)));
        assert!(!exporter.path().exists());
    }

    #[test]
    fn test_locked_message_names_file() {
        let err = ExportError::Locked(PathBuf::from("chat_history.xlsx"));
        assert!(err.to_string().starts_with("chat_history.xlsx is open"));
    }
}
