mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::run;
pub use application::DocumentPipelineUseCase;
pub use domain::error::{AppError, Result};
pub use domain::record::{AggregatedRecord, Field, FieldSource, Record};
pub use infrastructure::config::AppConfig;
