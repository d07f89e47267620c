use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::domain::error::{AppError, Result};

/// In-memory ZIP builder. Entries carry a fixed timestamp so the same
/// inputs always produce the same archive bytes.
pub struct ArchiveWriter {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    entries: usize,
}

impl ArchiveWriter {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            entries: 0,
        }
    }

    pub fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let options = FileOptions::<()>::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        self.writer.start_file(name, options).map_err(|e| {
            AppError::ArchiveError(format!("Failed to start archive entry {}: {}", name, e))
        })?;
        self.writer.write_all(bytes).map_err(|e| {
            AppError::ArchiveError(format!("Failed to write archive entry {}: {}", name, e))
        })?;
        self.entries += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}
