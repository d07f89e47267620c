// ============================================================
// SPREADSHEET READER
// ============================================================
// First worksheet of an XLSX/XLS workbook as a header row + rows

use std::fmt::Display;
use std::io::{Cursor, Read, Seek};

use calamine::{Data, Range, Reader, Xls, Xlsx};

use crate::domain::error::{AppError, Result};
use crate::domain::table::DecodedTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookKind {
    Xlsx,
    Xls,
}

/// Read the first sheet of an in-memory workbook.
pub fn read_first_sheet(bytes: &[u8], kind: WorkbookKind, file_name: &str) -> Result<DecodedTable> {
    let cursor = Cursor::new(bytes.to_vec());

    let range = match kind {
        WorkbookKind::Xlsx => {
            let mut workbook: Xlsx<_> = Xlsx::new(cursor).map_err(|e| open_error(file_name, e))?;
            first_range(&mut workbook, file_name)?
        }
        WorkbookKind::Xls => {
            let mut workbook: Xls<_> = Xls::new(cursor).map_err(|e| open_error(file_name, e))?;
            first_range(&mut workbook, file_name)?
        }
    };

    Ok(range_to_table(&range))
}

fn open_error(file_name: &str, err: impl Display) -> AppError {
    tracing::error!(file = %file_name, error = %err, "Failed to open workbook");
    AppError::DecodeError(format!("Failed to open Excel file {}: {}", file_name, err))
}

fn first_range<R, RS>(workbook: &mut R, file_name: &str) -> Result<Range<Data>>
where
    R: Reader<RS>,
    RS: Read + Seek,
    R::Error: Display,
{
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            AppError::DecodeError(format!("No worksheet found in Excel file {}", file_name))
        })?
        .map_err(|e| {
            AppError::DecodeError(format!("Failed to read Excel range {}: {}", file_name, e))
        })
}

/// First row becomes the headers; every later row is kept, blank or not.
fn range_to_table(range: &Range<Data>) -> DecodedTable {
    let mut rows = range.rows();

    let Some(header_row) = rows.next() else {
        return DecodedTable::default();
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| render_cell(cell).trim().to_string())
        .collect();

    let mut out = Vec::new();
    for row in rows {
        let values: Vec<String> = row
            .iter()
            .map(|cell| render_cell(cell).trim().to_string())
            .collect();
        out.push(values);
    }

    DecodedTable::new(headers, out)
}

/// Text form of a cell. Numbers render as plain decimals without
/// exponent or trailing zeros; date cells render their serial value.
pub fn render_cell(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => render_number(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => render_number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

fn render_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    // f64's Display is the shortest round-trip form and never uses an exponent.
    let text = format!("{}", value);
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}
