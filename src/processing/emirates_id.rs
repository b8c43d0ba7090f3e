//! Emirates ID field extraction.
//!
//! Three precedence tiers, consulted independently per field: the MRZ
//! block, label-anchored free text, and the Arabic-pass transcript for
//! the Arabic name. A lower tier is only consulted for fields the higher
//! tiers left empty.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::models::tables::{ARABIC_STOP_WORDS, NATIONALITY_ARABIC};
use crate::models::{EmiratesIdRecord, Sex};
use crate::processing::mrz::EidMrz;
use crate::processing::normalize::{
    contains_arabic, fix_digit_confusions, flexible_date_to_iso, format_eid_number,
    normalize_name, OcrText,
};

lazy_static! {
    static ref ID_NUMBER_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\bid\s*(?:number|no\.?)\s*[:#]?\s*(784[-\s0-9OIl]{11,20})").unwrap(),
        Regex::new(r"(?i)\bidentity\s*(?:card\s*)?(?:number|no\.?)\s*[:#]?\s*(784[-\s0-9OIl]{11,20})").unwrap(),
        Regex::new(r"\b(784-[0-9]{4}-[0-9]{7}-[0-9])\b").unwrap(),
        Regex::new(r"\b(784[0-9]{12})\b").unwrap(),
    ];

    static ref NAME_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\bname\s*[:#]?\s*([A-Z][A-Za-z]+(?:\s+[A-Z][A-Za-z]+)+)").unwrap(),
    ];

    static ref NATIONALITY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\bnationality\s*[:#]?\s*([A-Z]{3,15})\b").unwrap(),
        Regex::new(r"(?i)\bnationality\s*[:#]?\s*([A-Za-z]{3,15})\b").unwrap(),
    ];

    static ref DOB_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:date\s+of\s+birth|birth\s*date|dob|birth)\s*[:#]?\s*([0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{4})").unwrap(),
    ];

    static ref EXPIRY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:date\s+of\s+expiry|expiry\s*date|expiry|valid\s+until)\s*[:#]?\s*([0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{4})").unwrap(),
    ];

    static ref SEX_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(?:sex|gender)\s*[:#]?\s*([MF])\b").unwrap(),
        Regex::new(r"(?i)\b(?:sex|gender)\s*[:#]?\s*(male|female)\b").unwrap(),
    ];

    static ref ARABIC_NAME_LABEL_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?:الاسم|الإسم)\s*[:：]?\s*([\p{Arabic}][\p{Arabic}\s]{2,60})").unwrap(),
    ];
}

/// Words that mark the end of a free-text name capture: the greedy
/// capitalized-word pattern runs into the next field label on collapsed
/// OCR text.
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
    "card",
    "number",
    "id",
    "identity",
    "signature",
];

pub struct EmiratesIdExtractor;

impl EmiratesIdExtractor {
    /// Resolve an Emirates ID record from the English-pass transcript and
    /// an optional Arabic-pass transcript. A single pass, no retries; any
    /// field the tiers cannot settle is left empty.
    pub fn extract(english: &OcrText, arabic: &OcrText) -> EmiratesIdRecord {
        let mut record = EmiratesIdRecord::default();

        // Tier 1: MRZ block
        let mrz = EidMrz::parse(english);
        record.id_number = mrz.id_number;
        record.name_en = mrz.name;
        record.nationality = mrz.nationality;
        record.date_of_birth = mrz.date_of_birth;
        record.expiry_date = mrz.expiry_date;
        let mut sex = mrz.sex;

        // Tier 2: label-anchored free text, per still-empty field
        let full = &english.full_text;
        if record.id_number.is_empty() {
            if let Some(value) = Self::id_from_labels(full) {
                debug!("emirates id: id number resolved from labels");
                record.id_number = value;
            }
        }
        if record.name_en.is_empty() {
            if let Some(value) = Self::name_from_labels(full) {
                debug!("emirates id: name resolved from labels");
                record.name_en = value;
            }
        }
        if record.nationality.is_empty() {
            if let Some(value) = Self::nationality_from_labels(full) {
                record.nationality = value;
            }
        }
        if record.date_of_birth.is_empty() {
            if let Some(value) = first_capture(&DOB_PATTERNS, full) {
                record.date_of_birth = flexible_date_to_iso(&value);
            }
        }
        if record.expiry_date.is_empty() {
            if let Some(value) = first_capture(&EXPIRY_PATTERNS, full) {
                record.expiry_date = flexible_date_to_iso(&value);
            }
        }
        if sex.is_none() {
            sex = Self::sex_from_labels(full);
        }

        // Tier 3: Arabic-pass transcript, Arabic name only
        record.name_ar = Self::arabic_name(arabic).unwrap_or_default();

        record.sex = sex.unwrap_or_default();
        record.id_number = format_eid_number(&record.id_number);
        record.name_en = normalize_name(&record.name_en);
        record.nationality_ar = NATIONALITY_ARABIC
            .get(record.nationality.as_str())
            .map(|label| label.to_string())
            .unwrap_or_default();
        record
    }

    fn id_from_labels(full_text: &str) -> Option<String> {
        for pattern in ID_NUMBER_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(full_text) {
                if let Some(matched) = caps.get(1) {
                    let digits: String = fix_digit_confusions(matched.as_str())
                        .chars()
                        .filter(|c| c.is_ascii_digit())
                        .collect();
                    if digits.len() >= 12 {
                        return Some(digits);
                    }
                }
            }
        }
        None
    }

    fn name_from_labels(full_text: &str) -> Option<String> {
        for pattern in NAME_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(full_text) {
                if let Some(matched) = caps.get(1) {
                    let value = trim_at_boundary_word(matched.as_str());
                    if value.split_whitespace().count() >= 2 {
                        return Some(value);
                    }
                }
            }
        }
        None
    }

    fn nationality_from_labels(full_text: &str) -> Option<String> {
        for (index, pattern) in NATIONALITY_PATTERNS.iter().enumerate() {
            if let Some(caps) = pattern.captures(full_text) {
                if let Some(matched) = caps.get(1) {
                    let value = matched.as_str().to_uppercase();
                    // The lenient mixed-case alternative only accepts
                    // known nationality words
                    if index == 0 || NATIONALITY_ARABIC.contains_key(value.as_str()) {
                        return Some(value);
                    }
                }
            }
        }
        None
    }

    fn sex_from_labels(full_text: &str) -> Option<Sex> {
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

    /// Arabic name recovery: an explicit label wins; otherwise the first
    /// line of 2-4 Arabic words that carries no document-label word.
    fn arabic_name(arabic: &OcrText) -> Option<String> {
        for pattern in ARABIC_NAME_LABEL_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(&arabic.full_text) {
                if let Some(matched) = caps.get(1) {
                    // The capture runs into the next label on collapsed
                    // text; cut it at the first document-label word
                    let value = trim_at_arabic_stop_word(matched.as_str());
                    if !value.is_empty() {
                        debug!("emirates id: arabic name resolved from label");
                        return Some(value);
                    }
                }
            }
        }
        for line in &arabic.lines {
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.len() < 2 || words.len() > 4 {
                continue;
            }
            if !words.iter().all(|word| contains_arabic(word)) {
                continue;
            }
            if words.iter().any(|word| is_arabic_stop_word(word)) {
                continue;
            }
            return Some(words.join(" "));
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

fn is_arabic_stop_word(word: &str) -> bool {
    let trimmed = word.trim_matches(|c: char| c.is_ascii_punctuation() || c == '：');
    ARABIC_STOP_WORDS.contains(&trimmed)
}

fn trim_at_arabic_stop_word(value: &str) -> String {
    let mut kept = Vec::new();
    for word in value.split_whitespace() {
        if is_arabic_stop_word(word) {
            break;
        }
        kept.push(word);
    }
    kept.join(" ")
}

/// Truncate a captured run of capitalized words at the first word that is
/// itself a field label.
fn trim_at_boundary_word(value: &str) -> String {
    let mut kept = Vec::new();
    for word in value.split_whitespace() {
        if NAME_BOUNDARY_WORDS.contains(&word.to_lowercase().as_str()) {
            break;
        }
        kept.push(word);
    }
    kept.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MRZ_SAMPLE: &str =
        "ILARE138357150 9784199248566186\n920925M300925CHN<<<\n<<LI<YIWEN<<<<<<<<<<<<<<<<<<<<<<<";

    #[test]
    fn test_mrz_tier_resolves_all_key_fields() {
        let record =
            EmiratesIdExtractor::extract(&OcrText::new(MRZ_SAMPLE), &OcrText::new(""));
        assert_eq!(record.id_number, "784-1992-4856618-6");
        assert_eq!(record.name_en, "Li Yiwen");
        assert_eq!(record.nationality, "CHINA");
        assert_eq!(record.nationality_ar, "الصين");
        assert_eq!(record.date_of_birth, "1992-09-25");
        assert_eq!(record.sex, Sex::M);
        assert_eq!(record.expiry_date, "2030-09-25");
        assert_eq!(record.issue_date, "");
    }

    #[test]
    fn test_label_tier_fills_fields_the_mrz_missed() {
        let text = "ID Number: 784-1990-1234567-1\nName: John Smith\nNationality: INDIA\nDate of Birth: 01/02/1990\nExpiry Date: 01/02/2030\nSex: F";
        let record = EmiratesIdExtractor::extract(&OcrText::new(text), &OcrText::new(""));
        assert_eq!(record.id_number, "784-1990-1234567-1");
        assert_eq!(record.name_en, "John Smith");
        assert_eq!(record.nationality, "INDIA");
        assert_eq!(record.date_of_birth, "1990-02-01");
        assert_eq!(record.expiry_date, "2030-02-01");
        assert_eq!(record.sex, Sex::F);
    }

    #[test]
    fn test_name_capture_stops_at_next_label() {
        // Collapsed OCR text runs the name straight into the next label
        let text = "Name: John Smith Nationality: INDIA";
        let record = EmiratesIdExtractor::extract(&OcrText::new(text), &OcrText::new(""));
        assert_eq!(record.name_en, "John Smith");
        assert_eq!(record.nationality, "INDIA");
    }

    #[test]
    fn test_corrupting_one_tier_does_not_disturb_other_fields() {
        // Line 2 garbled: dates and sex degrade, id and name survive
        let garbled =
            "ILARE138357150 9784199248566186\nXXXXXXXX\n<<LI<YIWEN<<<<<<<<<<";
        let record =
            EmiratesIdExtractor::extract(&OcrText::new(garbled), &OcrText::new(""));
        assert_eq!(record.id_number, "784-1992-4856618-6");
        assert_eq!(record.name_en, "Li Yiwen");
        assert_eq!(record.date_of_birth, "");
        assert_eq!(record.sex, Sex::M);
    }

    #[test]
    fn test_arabic_name_from_label() {
        let arabic = "الجنسية: الصين\nالاسم: لي ييوين\nتاريخ الميلاد";
        let record =
            EmiratesIdExtractor::extract(&OcrText::new(""), &OcrText::new(arabic));
        assert_eq!(record.name_ar, "لي ييوين");
    }

    #[test]
    fn test_arabic_name_from_line_scan() {
        let arabic = "بطاقة الهوية الإمارات\nمحمد عبدالله الرشيد\nالجنسية باكستان";
        let record =
            EmiratesIdExtractor::extract(&OcrText::new(""), &OcrText::new(arabic));
        assert_eq!(record.name_ar, "محمد عبدالله الرشيد");
    }

    #[test]
    fn test_stop_list_lines_are_not_names() {
        let arabic = "الجنسية باكستان\nتاريخ الميلاد";
        let record =
            EmiratesIdExtractor::extract(&OcrText::new(""), &OcrText::new(arabic));
        assert_eq!(record.name_ar, "");
    }

    #[test]
    fn test_empty_inputs_degrade_to_empty_record() {
        let record = EmiratesIdExtractor::extract(&OcrText::new(""), &OcrText::new(""));
        assert_eq!(record, EmiratesIdRecord::default());
    }

    #[test]
    fn test_spelled_out_sex_value() {
        let text = "Name: Jane Doe Gender: Female";
        let record = EmiratesIdExtractor::extract(&OcrText::new(text), &OcrText::new(""));
        assert_eq!(record.sex, Sex::F);
    }
}
