pub mod document_extractor;
pub mod models;
pub mod processing;
pub mod utils;

pub use document_extractor::{DocumentExtractor, DEFAULT_SUCCESS_THRESHOLD};
pub use models::{DocumentType, ExtractionResult};
