pub mod archive;
pub mod bootstrap;
pub mod config;
pub mod docx;
pub mod tabular;
