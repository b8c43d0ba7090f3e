// Dispatches raw OCR transcripts to the per-type extractor and wraps the
// record in the result envelope the caller consumes.

use log::info;

use crate::models::{DocumentType, ExtractedData, ExtractionResult};
use crate::processing::{
    EmiratesIdExtractor, OcrText, PassportExtractor, TradeCertificateExtractor,
};

/// Success threshold over the key-field confidence ratio. A deliberately
/// low bar: one resolved key field out of four is still worth showing the
/// user for manual correction.
pub const DEFAULT_SUCCESS_THRESHOLD: f64 = 0.2;

/// Characters of concatenated input kept in the result as an audit aid.
const RAW_TEXT_LIMIT: usize = 1000;

pub struct DocumentExtractor {
    success_threshold: f64,
}

impl DocumentExtractor {
    pub fn new() -> Self {
        DocumentExtractor {
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
        }
    }

    pub fn with_threshold(success_threshold: f64) -> Self {
        DocumentExtractor { success_threshold }
    }

    /// Run one extraction pass. Either transcript may be empty; the result
    /// always carries a well-shaped record for a known document type.
    pub fn extract(
        &self,
        english_text: &str,
        arabic_text: &str,
        document_type: DocumentType,
    ) -> ExtractionResult {
        info!(
            "extracting {} document ({} en / {} ar chars)",
            document_type.tag(),
            english_text.len(),
            arabic_text.len()
        );
        let english = OcrText::new(english_text);
        let arabic = OcrText::new(arabic_text);

        let data = match document_type {
            DocumentType::EmiratesId => {
                ExtractedData::EmiratesId(EmiratesIdExtractor::extract(&english, &arabic))
            }
            DocumentType::Passport => {
                ExtractedData::Passport(PassportExtractor::extract(&english))
            }
            DocumentType::TradeCertificate => {
                // The trade certificate heuristics work over one combined
                // transcript; both passes cover the same sheet
                let combined = OcrText::new(&format!("{}\n{}", english_text, arabic_text));
                ExtractedData::TradeCertificate(TradeCertificateExtractor::extract(&combined))
            }
        };

        let confidence = confidence_for(&data);
        ExtractionResult {
            success: confidence > self.success_threshold,
            document_type: document_type.tag().to_string(),
            confidence,
            data: Some(data),
            raw_text: truncate_raw(english_text, arabic_text),
        }
    }

    /// Tag-based entry point for callers that carry the document type as a
    /// string. An unrecognized tag yields a null-data, zero-confidence
    /// result rather than an error.
    pub fn extract_tagged(
        &self,
        english_text: &str,
        arabic_text: &str,
        tag: &str,
    ) -> ExtractionResult {
        match DocumentType::from_tag(tag) {
            Some(document_type) => self.extract(english_text, arabic_text, document_type),
            None => ExtractionResult {
                success: false,
                document_type: tag.to_string(),
                confidence: 0.0,
                data: None,
                raw_text: truncate_raw(english_text, arabic_text),
            },
        }
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        DocumentExtractor::new()
    }
}

/// Ratio of resolved key fields for the document type. Plain counting, no
/// weighting.
fn confidence_for(data: &ExtractedData) -> f64 {
    let (resolved, total) = match data {
        ExtractedData::EmiratesId(record) => {
            let fields = [
                &record.id_number,
                &record.name_en,
                &record.nationality,
                &record.date_of_birth,
            ];
            (fields.iter().filter(|f| !f.is_empty()).count(), fields.len())
        }
        ExtractedData::Passport(record) => {
            let fields = [
                &record.passport_number,
                &record.name_en,
                &record.nationality,
                &record.date_of_birth,
            ];
            (fields.iter().filter(|f| !f.is_empty()).count(), fields.len())
        }
        ExtractedData::TradeCertificate(record) => {
            let checks = [
                !record.trade_name.is_empty(),
                !record.legal_form.is_empty(),
                !record.owners.is_empty(),
            ];
            (checks.iter().filter(|c| **c).count(), checks.len())
        }
    };
    resolved as f64 / total as f64
}

fn truncate_raw(english_text: &str, arabic_text: &str) -> String {
    english_text
        .chars()
        .chain(arabic_text.chars())
        .take(RAW_TEXT_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sex;

    const EID_SAMPLE: &str =
        "ILARE138357150 9784199248566186\n920925M300925CHN<<<\n<<LI<YIWEN<<<<<<<<<<<<<<<<<<<<<<<";

    #[test]
    fn test_emirates_id_end_to_end() {
        let result = DocumentExtractor::new().extract(EID_SAMPLE, "", DocumentType::EmiratesId);
        assert!(result.success);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.document_type, "emirates_id");
        match result.data.unwrap() {
            ExtractedData::EmiratesId(record) => {
                assert_eq!(record.id_number, "784-1992-4856618-6");
                assert_eq!(record.name_en, "Li Yiwen");
                assert_eq!(record.date_of_birth, "1992-09-25");
                assert_eq!(record.sex, Sex::M);
                assert_eq!(record.expiry_date, "2030-09-25");
                assert_eq!(record.nationality, "CHINA");
            }
            other => panic!("unexpected record variant: {:?}", other),
        }
    }

    #[test]
    fn test_extract_is_idempotent() {
        let extractor = DocumentExtractor::new();
        let first = extractor.extract(EID_SAMPLE, "", DocumentType::EmiratesId);
        let second = extractor.extract(EID_SAMPLE, "", DocumentType::EmiratesId);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_tag_yields_null_data() {
        let result = DocumentExtractor::new().extract_tagged("some text", "", "driving_licence");
        assert!(!result.success);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.data, None);
        assert_eq!(result.document_type, "driving_licence");
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let result = DocumentExtractor::new().extract("", "", DocumentType::EmiratesId);
        assert!(!result.success);
        assert_eq!(result.confidence, 0.0);
        match result.data.unwrap() {
            ExtractedData::EmiratesId(record) => {
                assert_eq!(record.id_number, "");
                assert_eq!(record.name_en, "");
            }
            other => panic!("unexpected record variant: {:?}", other),
        }
    }

    #[test]
    fn test_garbage_input_degrades_to_empty_fields() {
        let garbage = "\u{0}\u{1}£$%^&*()!@ ~~~ 01";
        for document_type in [
            DocumentType::EmiratesId,
            DocumentType::Passport,
            DocumentType::TradeCertificate,
        ] {
            let result = DocumentExtractor::new().extract(garbage, garbage, document_type);
            assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
            assert!(result.data.is_some());
        }
    }

    #[test]
    fn test_confidence_counts_partial_fields() {
        // Only the passport number resolves: 1 of 4 key fields
        let result =
            DocumentExtractor::new().extract("Passport No: EF0012318", "", DocumentType::Passport);
        assert_eq!(result.confidence, 0.25);
        assert!(result.success);
    }

    #[test]
    fn test_threshold_is_tunable() {
        let strict = DocumentExtractor::with_threshold(0.5);
        let result = strict.extract("Passport No: EF0012318", "", DocumentType::Passport);
        assert_eq!(result.confidence, 0.25);
        assert!(!result.success);
    }

    #[test]
    fn test_raw_text_is_truncated() {
        let long = "x".repeat(3000);
        let result = DocumentExtractor::new().extract(&long, "", DocumentType::Passport);
        assert_eq!(result.raw_text.chars().count(), 1000);
    }

    #[test]
    fn test_raw_text_concatenates_both_inputs() {
        let result = DocumentExtractor::new().extract("abc", "def", DocumentType::Passport);
        assert_eq!(result.raw_text, "abcdef");
    }

    #[test]
    fn test_trade_certificate_end_to_end() {
        let text = "Trade Name HORIZON CAFE L.L.C 42644548 Owner China LI YIWEN Economic Registry Number 123456 Retail Sale of Tea";
        let result = DocumentExtractor::new().extract(text, "", DocumentType::TradeCertificate);
        assert!(result.success);
        assert_eq!(result.confidence, 1.0);
        match result.data.unwrap() {
            ExtractedData::TradeCertificate(record) => {
                assert!(record.trade_name.starts_with("HORIZON CAFE"));
                assert_eq!(record.owners.len(), 1);
                assert_eq!(record.activities.len(), 1);
            }
            other => panic!("unexpected record variant: {:?}", other),
        }
    }

    #[test]
    fn test_result_serializes_to_contract_shape() {
        let result = DocumentExtractor::new().extract(EID_SAMPLE, "", DocumentType::EmiratesId);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["documentType"], "emirates_id");
        assert_eq!(json["data"]["idNumber"], "784-1992-4856618-6");
        assert_eq!(json["success"], true);
    }
}
