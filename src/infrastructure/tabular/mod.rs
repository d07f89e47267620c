// ============================================================
// TABULAR DECODER
// ============================================================
// Raw upload bytes -> DecodedTable, picking the reader from the
// file name the same way for every entry point

mod delimited;
mod spreadsheet;

pub use delimited::DelimitedReader;
pub use spreadsheet::{read_first_sheet, render_cell, WorkbookKind};

use crate::domain::error::Result;
use crate::domain::table::DecodedTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Delimited,
    Workbook(WorkbookKind),
}

impl TabularFormat {
    /// Spreadsheet extensions select a workbook reader; anything else is
    /// treated as delimited text.
    pub fn from_file_name(file_name: &str) -> Self {
        let lower = file_name.trim().to_ascii_lowercase();
        if lower.ends_with(".xlsx") || lower.ends_with(".xlsm") {
            TabularFormat::Workbook(WorkbookKind::Xlsx)
        } else if lower.ends_with(".xls") {
            TabularFormat::Workbook(WorkbookKind::Xls)
        } else {
            TabularFormat::Delimited
        }
    }
}

pub fn decode(bytes: &[u8], file_name: &str) -> Result<DecodedTable> {
    let format = TabularFormat::from_file_name(file_name);
    tracing::debug!(file = %file_name, ?format, size = bytes.len(), "Decoding tabular upload");

    let table = match format {
        TabularFormat::Delimited => DelimitedReader::new().read_bytes(bytes, file_name)?,
        TabularFormat::Workbook(kind) => read_first_sheet(bytes, kind, file_name)?,
    };

    tracing::info!(
        file = %file_name,
        columns = table.headers.len(),
        rows = table.len(),
        "Decoded tabular upload"
    );
    Ok(table)
}
