//! Passport field extraction from the visible data page.
//!
//! No MRZ tier: passports reach this system as a single English-pass
//! transcript of the data page. Every field is independently optional.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::models::tables::NATIONALITY_ARABIC;
use crate::models::{PassportRecord, Sex};
use crate::processing::normalize::{flexible_date_to_iso, normalize_name, OcrText};

lazy_static! {
    static ref PASSPORT_NUMBER_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\bpassport\s*(?:number|no\.?)\s*[:#]?\s*([A-Za-z]{1,2}[0-9]{7,8})\b").unwrap(),
        Regex::new(r"(?i)\bdocument\s*(?:number|no\.?)\s*[:#]?\s*([A-Za-z]{1,2}[0-9]{7,8})\b").unwrap(),
        Regex::new(r"\b([A-Za-z]{1,2}[0-9]{7,8})\b").unwrap(),
    ];

    static ref NAME_PATTERNS: Vec<Regex> = vec![
        // Surname, Givenname preferred
        Regex::new(r"(?i)\bname\s*[:#]?\s*([A-Z][A-Za-z]*\s*,\s*[A-Z][A-Za-z]*)").unwrap(),
        Regex::new(r"(?i)\bname\s*[:#]?\s*([A-Z][A-Za-z]+(?:\s+[A-Z][A-Za-z]+)+)").unwrap(),
        Regex::new(r"\b([A-Z]{2,}\s*,\s*[A-Z]{2,})\b").unwrap(),
    ];

    static ref NATIONALITY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\bnationality\s*[:#]?\s*([A-Z]{3,15})\b").unwrap(),
        Regex::new(r"(?i)\bnationality\s*[:#]?\s*([A-Za-z]{3,15})\b").unwrap(),
    ];

    static ref DOB_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:date\s+of\s+birth|birth\s*date|dob|birth)\s*[:#]?\s*([0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{4})").unwrap(),
        Regex::new(r"(?i)(?:date\s+of\s+birth|birth\s*date|dob|birth)\s*[:#]?\s*([0-9]{1,2}\s+[A-Za-z]{3}\s+[0-9]{4})").unwrap(),
    ];

    static ref ISSUE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:date\s+of\s+issue|issue\s*date|issued\s+on)\s*[:#]?\s*([0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{4})").unwrap(),
        Regex::new(r"(?i)(?:date\s+of\s+issue|issue\s*date|issued\s+on)\s*[:#]?\s*([0-9]{1,2}\s+[A-Za-z]{3}\s+[0-9]{4})").unwrap(),
    ];

    static ref EXPIRY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:date\s+of\s+expiry|expiry\s*date|expiry|valid\s+until)\s*[:#]?\s*([0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{4})").unwrap(),
        Regex::new(r"(?i)(?:date\s+of\s+expiry|expiry\s*date|expiry|valid\s+until)\s*[:#]?\s*([0-9]{1,2}\s+[A-Za-z]{3}\s+[0-9]{4})").unwrap(),
    ];

    static ref SEX_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(?:sex|gender)\s*[:#]?\s*([MF])\b").unwrap(),
        Regex::new(r"(?i)\b(?:sex|gender)\s*[:#]?\s*(male|female)\b").unwrap(),
    ];
}

const NAME_BOUNDARY_WORDS: &[&str] = &[
    "name",
    "nationality",
    "date",
    "birth",
    "dob",
    "sex",
    "gender",
    "expiry",
    "issue",
    "issued",
    "passport",
    "document",
    "number",
    "place",
    "authority",
];

pub struct PassportExtractor;

impl PassportExtractor {
    pub fn extract(english: &OcrText) -> PassportRecord {
        let full = &english.full_text;
        let mut record = PassportRecord::default();

        if let Some(value) = first_capture(&PASSPORT_NUMBER_PATTERNS, full) {
            debug!("passport: number resolved");
            record.passport_number = value.to_uppercase();
        }
        if let Some(value) = Self::name(full) {
            record.name_en = normalize_name(&value);
        }
        if let Some(value) = Self::nationality(full) {
            record.nationality = value;
        }
        if let Some(value) = first_capture(&DOB_PATTERNS, full) {
            record.date_of_birth = flexible_date_to_iso(&value);
        }
        if let Some(value) = first_capture(&ISSUE_PATTERNS, full) {
            record.issue_date = flexible_date_to_iso(&value);
        }
        if let Some(value) = first_capture(&EXPIRY_PATTERNS, full) {
            record.expiry_date = flexible_date_to_iso(&value);
        }
        record.sex = Self::sex(full).unwrap_or_default();
        record.nationality_ar = NATIONALITY_ARABIC
            .get(record.nationality.as_str())
            .map(|label| label.to_string())
            .unwrap_or_default();
        record
    }

    fn name(full_text: &str) -> Option<String> {
        for pattern in NAME_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(full_text) {
                if let Some(matched) = caps.get(1) {
                    let value = trim_at_boundary_word(matched.as_str());
                    if value.split_whitespace().count() >= 2 || value.contains(',') {
                        return Some(value);
                    }
                }
            }
        }
        None
    }

    fn nationality(full_text: &str) -> Option<String> {
        for (index, pattern) in NATIONALITY_PATTERNS.iter().enumerate() {
            if let Some(caps) = pattern.captures(full_text) {
                if let Some(matched) = caps.get(1) {
                    let value = matched.as_str().to_uppercase();
                    if index == 0 || NATIONALITY_ARABIC.contains_key(value.as_str()) {
                        return Some(value);
                    }
                }
            }
        }
        None
    }

    fn sex(full_text: &str) -> Option<Sex> {
        for pattern in SEX_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(full_text) {
                if let Some(matched) = caps.get(1) {
                    return match matched.as_str().to_uppercase().as_str() {
                        "M" | "MALE" => Some(Sex::M),
                        "F" | "FEMALE" => Some(Sex::F),
                        _ => None,
                    };
                }
            }
        }
        None
    }
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    for pattern in patterns {
        if let Some(caps) = pattern.captures(text) {
            if let Some(matched) = caps.get(1) {
                return Some(matched.as_str().trim().to_string());
            }
        }
    }
    None
}

fn trim_at_boundary_word(value: &str) -> String {
    let mut kept = Vec::new();
    for word in value.split_whitespace() {
        let bare = word.trim_matches(',');
        if NAME_BOUNDARY_WORDS.contains(&bare.to_lowercase().as_str()) {
            break;
        }
        kept.push(word);
    }
    kept.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Passport No: EF0012318 Name: LI, YIWEN Nationality: CHINESE Date of birth: 25 SEP 1992 Sex: F";

    #[test]
    fn test_basic_data_page() {
        let record = PassportExtractor::extract(&OcrText::new(SAMPLE));
        assert_eq!(record.passport_number, "EF0012318");
        assert_eq!(record.name_en, "Li Yiwen");
        assert_eq!(record.nationality, "CHINESE");
        assert_eq!(record.nationality_ar, "الصين");
        assert_eq!(record.date_of_birth, "1992-09-25");
        assert_eq!(record.sex, Sex::F);
    }

    #[test]
    fn test_slash_dates_and_issue_expiry() {
        let text = "Passport No: A1234567 Name: John Smith Date of issue: 05/01/2020 Date of expiry: 05/01/2030";
        let record = PassportExtractor::extract(&OcrText::new(text));
        assert_eq!(record.passport_number, "A1234567");
        assert_eq!(record.issue_date, "2020-01-05");
        assert_eq!(record.expiry_date, "2030-01-05");
    }

    #[test]
    fn test_lowercase_number_is_uppercased() {
        let text = "Passport No: ef0012318";
        let record = PassportExtractor::extract(&OcrText::new(text));
        assert_eq!(record.passport_number, "EF0012318");
    }

    #[test]
    fn test_sex_defaults_to_m_when_absent() {
        let record = PassportExtractor::extract(&OcrText::new("Name: John Smith"));
        assert_eq!(record.sex, Sex::M);
    }

    #[test]
    fn test_empty_input_yields_empty_record() {
        let record = PassportExtractor::extract(&OcrText::new(""));
        assert_eq!(record, PassportRecord::default());
    }

    #[test]
    fn test_bare_number_fallback_without_label() {
        let text = "Republic of India P EF0012318 SMITH, JOHN";
        let record = PassportExtractor::extract(&OcrText::new(text));
        assert_eq!(record.passport_number, "EF0012318");
        assert_eq!(record.name_en, "Smith John");
    }
}
