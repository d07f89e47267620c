pub mod error;
pub mod record;
pub mod table;
