pub mod use_cases;

pub use use_cases::document_pipeline::DocumentPipelineUseCase;
