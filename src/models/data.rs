use serde::{Deserialize, Serialize};

/// Document types the extraction pipeline can be dispatched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    EmiratesId,
    Passport,
    TradeCertificate,
}

impl DocumentType {
    /// Resolve a caller-supplied type tag. Unknown tags yield None so the
    /// caller can return a null-data result instead of failing.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "emirates_id" => Some(DocumentType::EmiratesId),
            "passport" => Some(DocumentType::Passport),
            "trade_certificate" => Some(DocumentType::TradeCertificate),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            DocumentType::EmiratesId => "emirates_id",
            DocumentType::Passport => "passport",
            DocumentType::TradeCertificate => "trade_certificate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    M,
    F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerRole {
    Owner,
    Manager,
}

impl OwnerRole {
    pub fn arabic(&self) -> &'static str {
        match self {
            OwnerRole::Owner => "مالك",
            OwnerRole::Manager => "مدير",
        }
    }
}

/// Fields resolved from an Emirates ID card. Unresolved fields stay empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiratesIdRecord {
    /// 784-YYYY-NNNNNNN-C when a full 15-digit number was resolved,
    /// otherwise the raw digit run.
    pub id_number: String,
    pub name_en: String,
    pub name_ar: String,
    pub nationality: String,
    pub nationality_ar: String,
    /// ISO date (YYYY-MM-DD) or empty.
    pub date_of_birth: String,
    pub sex: Sex,
    /// Not reliably printed on the card face; commonly left empty.
    pub issue_date: String,
    pub expiry_date: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportRecord {
    /// 1-2 letters followed by 7-8 digits, uppercased.
    pub passport_number: String,
    pub name_en: String,
    pub nationality: String,
    pub nationality_ar: String,
    pub date_of_birth: String,
    pub sex: Sex,
    pub issue_date: String,
    pub expiry_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRecord {
    pub id_number: String,
    pub name_en: String,
    pub name_ar: String,
    pub role: OwnerRole,
    pub role_ar: String,
    pub nationality: String,
    pub nationality_ar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// 7-digit economic activity code, or empty when none was printed
    /// near the activity phrase.
    pub code: String,
    pub name_en: String,
    pub name_ar: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeCertificateRecord {
    pub trade_name: String,
    pub trade_name_ar: String,
    pub legal_form: String,
    pub legal_form_ar: String,
    pub issue_date: String,
    pub expiry_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub economic_registry_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_number: Option<String>,
    pub owners: Vec<OwnerRecord>,
    pub activities: Vec<ActivityRecord>,
}

/// The per-type record produced by one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractedData {
    EmiratesId(EmiratesIdRecord),
    Passport(PassportRecord),
    TradeCertificate(TradeCertificateRecord),
}

/// Result envelope returned to the caller for every extraction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub success: bool,
    pub document_type: String,
    /// Fraction of the document type's key fields that were resolved.
    pub confidence: f64,
    pub data: Option<ExtractedData>,
    /// Concatenated inputs truncated to the first 1000 characters; an
    /// audit aid, not meant for re-parsing.
    pub raw_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_tag_round_trip() {
        for tag in ["emirates_id", "passport", "trade_certificate"] {
            let parsed = DocumentType::from_tag(tag).unwrap();
            assert_eq!(parsed.tag(), tag);
        }
        assert_eq!(DocumentType::from_tag("driving_licence"), None);
    }

    #[test]
    fn test_sex_defaults_to_m() {
        assert_eq!(Sex::default(), Sex::M);
        assert_eq!(EmiratesIdRecord::default().sex, Sex::M);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = EmiratesIdRecord {
            id_number: "784-1992-4856618-6".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["idNumber"], "784-1992-4856618-6");
        assert_eq!(json["sex"], "M");
        assert_eq!(json["nameEn"], "");
    }

    #[test]
    fn test_owner_role_arabic_labels() {
        assert_eq!(OwnerRole::Owner.arabic(), "مالك");
        assert_eq!(OwnerRole::Manager.arabic(), "مدير");
    }
}
