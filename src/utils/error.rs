use thiserror::Error;

/// Errors surfaced at the crate boundary. Field extraction itself never
/// fails: unresolved fields degrade to empty strings in the output record.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),
    #[error("failed to read transcript: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize extraction result: {0}")]
    Serialize(#[from] serde_json::Error),
}
