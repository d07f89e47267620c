use std::path::{Path, PathBuf};

use crate::application::use_cases::aggregation::aggregate;
use crate::application::use_cases::batch_packager::package_batch;
use crate::application::use_cases::record_normalizer::normalize_table;
use crate::domain::error::{AppError, Result};
use crate::domain::record::Record;
use crate::infrastructure::docx::TemplateDocument;
use crate::infrastructure::tabular;

/// Upload bytes -> records -> packaged documents, against one template file.
pub struct DocumentPipelineUseCase {
    template_path: PathBuf,
}

impl DocumentPipelineUseCase {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Read the template from disk. Called once per batch.
    pub fn load_template(&self) -> Result<TemplateDocument> {
        TemplateDocument::load(&self.template_path)
    }

    pub fn parse(&self, bytes: &[u8], file_name: &str) -> Result<Vec<Record>> {
        if bytes.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Uploaded file {} is empty",
                file_name
            )));
        }

        let table = tabular::decode(bytes, file_name)?;
        Ok(normalize_table(&table))
    }

    /// One document per record.
    pub fn generate(&self, bytes: &[u8], file_name: &str) -> Result<Vec<u8>> {
        let template = self.load_template()?;
        let records = self.parse(bytes, file_name)?;

        tracing::info!(
            file = %file_name,
            records = records.len(),
            "Generating documents per record"
        );
        package_batch(&records, &template)
    }

    /// One document per importer.
    pub fn generate_aggregated(&self, bytes: &[u8], file_name: &str) -> Result<Vec<u8>> {
        let template = self.load_template()?;
        let records = self.parse(bytes, file_name)?;
        let aggregated = aggregate(&records);

        tracing::info!(
            file = %file_name,
            records = records.len(),
            importers = aggregated.len(),
            "Generating documents per importer"
        );
        package_batch(&aggregated, &template)
    }
}
