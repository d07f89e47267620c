// ============================================================
// BATCH PACKAGER
// ============================================================
// One rendered document per input item, bundled into a single
// ZIP in input order. Any failure aborts the whole batch.

use crate::application::use_cases::template_engine;
use crate::domain::error::Result;
use crate::domain::record::FieldSource;
use crate::infrastructure::archive::ArchiveWriter;
use crate::infrastructure::docx::TemplateDocument;

const UNKNOWN_IMPORTER: &str = "Unknown";
const FORBIDDEN_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Render every item against `template` and return the archive bytes.
pub fn package_batch<S>(items: &[S], template: &TemplateDocument) -> Result<Vec<u8>>
where
    S: FieldSource,
{
    let mut archive = ArchiveWriter::new();

    for (i, item) in items.iter().enumerate() {
        let bytes = template_engine::render(template, item)?;
        let name = entry_name(i + 1, item.importer_name());
        archive.add_entry(&name, &bytes)?;
    }

    tracing::info!(
        documents = archive.len(),
        template = %template.source(),
        "Packaged document batch"
    );
    archive.finish()
}

/// `Document_<index>_<importer>.docx`, index starting at 1.
pub fn entry_name(index: usize, importer: Option<&str>) -> String {
    format!("Document_{}_{}.docx", index, sanitize_file_name(importer))
}

pub fn sanitize_file_name(name: Option<&str>) -> String {
    let Some(name) = name else {
        return UNKNOWN_IMPORTER.to_string();
    };

    name.chars()
        .map(|c| if FORBIDDEN_NAME_CHARS.contains(&c) { '_' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
