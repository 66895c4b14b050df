//! Workbook storage adapter over umya-spreadsheet
//!
//! Owns the concerns the exporter relies on but does not enforce itself:
//! duplicate sheet titles are disambiguated here, and saves go through a
//! temporary file in the target directory that is renamed over the target, so
//! a failed save leaves the existing workbook untouched.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tempfile::NamedTempFile;
use umya_spreadsheet::{Spreadsheet, Worksheet};

use super::sheet_name::unique_sheet_name;

pub struct WorkbookStore {
    book: Spreadsheet,
    is_new: bool,
}

impl WorkbookStore {
    /// Load the workbook at `path`, or start an empty one if it does not exist
    pub fn open_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let book = umya_spreadsheet::reader::xlsx::read(path)
                .map_err(|e| anyhow!("{:?}", e))
                .with_context(|| format!("Failed to read workbook: {}", path.display()))?;
            Ok(Self { book, is_new: false })
        } else {
            Ok(Self { book: umya_spreadsheet::new_file(), is_new: true })
        }
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.book.get_sheet_collection().iter().map(|s| s.get_name().to_string()).collect()
    }

    /// Rename the only sheet of a fresh workbook and make it active
    pub fn claim_default_sheet(&mut self, title: &str) -> Result<&mut Worksheet> {
        let sheets = self.book.get_sheet_collection_mut();
        let sheet = sheets.first_mut().context("New workbook has no default sheet")?;
        sheet.set_name(title);
        self.book.set_active_sheet(0);
        Ok(&mut self.book.get_sheet_collection_mut()[0])
    }

    /// Add a sheet titled `title` (suffixed if taken) as the first, active sheet
    pub fn insert_front_sheet(&mut self, title: &str) -> Result<&mut Worksheet> {
        let names = self.sheet_names();
        let unique = unique_sheet_name(title, names.iter().map(String::as_str));
        if unique != title {
            tracing::debug!(requested = title, actual = %unique, "sheet title disambiguated");
        }

        self.book
            .new_sheet(unique.as_str())
            .map_err(|e| anyhow!("Failed to add sheet '{}': {}", unique, e))?;

        let sheets = self.book.get_sheet_collection_mut();
        sheets.rotate_right(1);
        self.book.set_active_sheet(0);
        Ok(&mut self.book.get_sheet_collection_mut()[0])
    }

    /// Serialize to a temp file beside `path`, then atomically replace `path`
    pub fn save_atomic(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        umya_spreadsheet::writer::xlsx::write_writer(&self.book, temp.as_file_mut())
            .map_err(|e| anyhow!("{:?}", e))
            .context("Failed to serialize workbook")?;
        temp.as_file().sync_all().context("Failed to flush workbook")?;

        // The temp file is created owner-only; keep the replaced workbook's mode
        if let Ok(existing) = fs::metadata(path) {
            temp.as_file()
                .set_permissions(existing.permissions())
                .context("Failed to copy workbook permissions")?;
        }

        temp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace workbook: {}", path.display()))?;
        Ok(())
    }
}
