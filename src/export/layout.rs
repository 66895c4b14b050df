//! Fixed sheet layout and formatting
//!
//! Rows and columns are addressed with 1-based [`CellRef`] indices. The
//! positions below are the on-disk contract: timestamp in A1, headers on row
//! 2, one message per row from row 3, role in column A, content in column B.

use umya_spreadsheet::{VerticalAlignmentValues, Worksheet};

use crate::models::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// umya addresses cells as (column, row)
    fn coords(self) -> (u32, u32) {
        (self.col, self.row)
    }
}

pub const ROLE_COL: u32 = 1;
pub const CONTENT_COL: u32 = 2;
pub const TIMESTAMP_CELL: CellRef = CellRef::new(1, ROLE_COL);
pub const HEADER_ROW: u32 = 2;
pub const FIRST_MESSAGE_ROW: u32 = HEADER_ROW + 1;

pub const ROLE_HEADER: &str = "role";
pub const CONTENT_HEADER: &str = "content";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const ROLE_COL_WIDTH: f64 = 12.0;
pub const CONTENT_COL_WIDTH: f64 = 100.0;
/// Height of one line of text in points
pub const LINE_HEIGHT: f64 = 15.0;

const HEADER_FONT_ARGB: &str = "FFFFFFFF";
const HEADER_FILL_ARGB: &str = "FF006400";

/// Row that holds the `index`-th message of the transcript
pub fn message_row(index: usize) -> u32 {
    FIRST_MESSAGE_ROW + index as u32
}

/// Row height that keeps every line of `message` visible
pub fn row_height(message: &Message) -> f64 {
    LINE_HEIGHT * message.line_count() as f64
}

fn set_text(sheet: &mut Worksheet, cell: CellRef, text: &str) {
    sheet.get_cell_mut(cell.coords()).set_value_string(text);
}

/// Write timestamp, headers and transcript rows, then format the sheet
pub fn write_transcript(sheet: &mut Worksheet, timestamp: &str, transcript: &[Message]) {
    set_text(sheet, TIMESTAMP_CELL, timestamp);
    set_text(sheet, CellRef::new(HEADER_ROW, ROLE_COL), ROLE_HEADER);
    set_text(sheet, CellRef::new(HEADER_ROW, CONTENT_COL), CONTENT_HEADER);

    for (i, message) in transcript.iter().enumerate() {
        let row = message_row(i);
        set_text(sheet, CellRef::new(row, ROLE_COL), message.role.as_str());
        set_text(sheet, CellRef::new(row, CONTENT_COL), &message.content);
    }

    apply_formatting(sheet, transcript);
}

fn apply_formatting(sheet: &mut Worksheet, transcript: &[Message]) {
    for col in [ROLE_COL, CONTENT_COL] {
        let style = sheet.get_style_mut(CellRef::new(HEADER_ROW, col).coords());
        style.get_font_mut().set_bold(true);
        style.get_font_mut().get_color_mut().set_argb(HEADER_FONT_ARGB);
        style.set_background_color(HEADER_FILL_ARGB);
    }

    sheet.get_column_dimension_mut("A").set_width(ROLE_COL_WIDTH);
    sheet.get_column_dimension_mut("B").set_width(CONTENT_COL_WIDTH);

    for (i, message) in transcript.iter().enumerate() {
        let row = message_row(i);

        let alignment =
            sheet.get_style_mut(CellRef::new(row, CONTENT_COL).coords()).get_alignment_mut();
        alignment.set_wrap_text(true);
        alignment.set_vertical(VerticalAlignmentValues::Top);
        sheet
            .get_style_mut(CellRef::new(row, ROLE_COL).coords())
            .get_alignment_mut()
            .set_vertical(VerticalAlignmentValues::Top);

        let dimension = sheet.get_row_dimension_mut(&row);
        dimension.set_height(row_height(message));
        dimension.set_custom_height(true);
    }
}
