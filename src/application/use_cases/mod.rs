pub mod aggregation;
pub mod batch_packager;
pub mod document_pipeline;
pub mod duty_record_schema;
pub mod placeholder_vocabulary;
pub mod record_normalizer;
pub mod template_engine;
