pub mod data;
pub mod tables;

pub use data::{
    ActivityRecord, DocumentType, EmiratesIdRecord, ExtractedData, ExtractionResult, OwnerRecord,
    OwnerRole, PassportRecord, Sex, TradeCertificateRecord,
};
