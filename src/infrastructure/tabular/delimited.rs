// ============================================================
// DELIMITED TEXT READER
// ============================================================
// Header row + data rows from CSV-like bytes, with encoding
// fallback and delimiter detection

use std::borrow::Cow;

use csv::{ReaderBuilder, Trim};

use crate::domain::error::{AppError, Result};
use crate::domain::table::DecodedTable;

/// Reader for delimited text with a header row; the delimiter is
/// detected from the content.
#[derive(Debug, Default)]
pub struct DelimitedReader;

impl DelimitedReader {
    pub fn new() -> Self {
        Self
    }

    /// Decode raw bytes into a table
    pub fn read_bytes(&self, bytes: &[u8], file_name: &str) -> Result<DecodedTable> {
        let content = decode_text(bytes);
        self.read_str(&content, file_name)
    }

    /// Parse already-decoded text into a table
    pub fn read_str(&self, content: &str, file_name: &str) -> Result<DecodedTable> {
        let delimiter = Self::detect_delimiter(content);

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| {
                AppError::DecodeError(format!(
                    "Failed to read header row of {}: {}",
                    file_name, e
                ))
            })?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::DecodeError(format!(
                    "Failed to parse row {} of {}: {}",
                    index + 1,
                    file_name,
                    e
                ))
            })?;

            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        if headers.iter().all(|h| h.is_empty()) {
            return Ok(DecodedTable::default());
        }

        Ok(DecodedTable::new(headers, rows))
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(10)
            .collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.chars().filter(|&c| c == delimiter as char).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

/// UTF-8 (BOM stripped) with a Windows-1252 fallback for legacy exports
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if !had_errors {
        return text;
    }

    tracing::debug!("input is not valid UTF-8, decoding as Windows-1252");
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text
}
