//! Text views over raw OCR output plus the shared field normalizers.
//!
//! Every extractor works from the same two views: a single-line full text
//! for patterns that span OCR line breaks, and a trimmed line array for
//! line-anchored heuristics. Both are derived from the same input string.

use chrono::NaiveDate;

use crate::models::tables::MONTH_ABBREVIATIONS;

/// The two derived views of one raw OCR transcript.
#[derive(Debug, Clone)]
pub struct OcrText {
    /// All newlines and whitespace runs collapsed to single spaces.
    pub full_text: String,
    /// Trimmed lines with blanks dropped.
    pub lines: Vec<String>,
}

impl OcrText {
    pub fn new(raw: &str) -> Self {
        let full_text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let lines = raw
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        OcrText { full_text, lines }
    }

    pub fn is_empty(&self) -> bool {
        self.full_text.is_empty()
    }
}

/// Strip commas, collapse whitespace, and title-case each word.
pub fn normalize_name(raw: &str) -> String {
    raw.replace(',', " ")
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Canonical Emirates ID segmentation. Separators are stripped first; a
/// 15-digit run becomes 784-YYYY-NNNNNNN-C, anything else passes through
/// as the bare digit string.
pub fn format_eid_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 15 {
        format!(
            "{}-{}-{}-{}",
            &digits[..3],
            &digits[3..7],
            &digits[7..14],
            &digits[14..]
        )
    } else {
        digits
    }
}

/// MRZ two-digit year pivot: years above 50 are 19xx, the rest 20xx.
pub fn expand_mrz_year(yy: u32) -> i32 {
    if yy > 50 {
        1900 + yy as i32
    } else {
        2000 + yy as i32
    }
}

/// Convert an MRZ YYMMDD group to an ISO date, or empty when the group is
/// malformed or not a real calendar date.
pub fn mrz_date_to_iso(yymmdd: &str) -> String {
    if yymmdd.len() != 6 || !yymmdd.chars().all(|c| c.is_ascii_digit()) {
        return String::new();
    }
    let yy: u32 = yymmdd[..2].parse().unwrap_or(0);
    let month: u32 = yymmdd[2..4].parse().unwrap_or(0);
    let day: u32 = yymmdd[4..6].parse().unwrap_or(0);
    match NaiveDate::from_ymd_opt(expand_mrz_year(yy), month, day) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// Convert a DD/MM/YYYY or DD-MM-YYYY string to ISO, or empty.
pub fn dmy_to_iso(value: &str) -> String {
    let parts: Vec<&str> = value.split(['/', '-']).collect();
    if parts.len() != 3 {
        return String::new();
    }
    let day: u32 = parts[0].trim().parse().unwrap_or(0);
    let month: u32 = parts[1].trim().parse().unwrap_or(0);
    let year: i32 = parts[2].trim().parse().unwrap_or(0);
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// Convert a "DD MMM YYYY" string (three-letter month abbreviation) to
/// ISO, or empty.
pub fn month_name_date_to_iso(value: &str) -> String {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != 3 {
        return String::new();
    }
    let day: u32 = parts[0].parse().unwrap_or(0);
    let month = match MONTH_ABBREVIATIONS.get(parts[1].to_lowercase().trim_end_matches('.')) {
        Some(m) => *m,
        None => return String::new(),
    };
    let year: i32 = parts[2].parse().unwrap_or(0);
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// Coerce any of the accepted free-text date shapes to ISO.
pub fn flexible_date_to_iso(value: &str) -> String {
    if value.contains('/') || value.contains('-') {
        dmy_to_iso(value)
    } else {
        month_name_date_to_iso(value)
    }
}

/// True when the text carries any Arabic-script character, including the
/// presentation-form blocks OCR engines sometimes emit.
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(|c| {
        ('\u{0600}'..='\u{06FF}').contains(&c)
            || ('\u{FB50}'..='\u{FDFF}').contains(&c)
            || ('\u{FE70}'..='\u{FEFF}').contains(&c)
    })
}

/// Repair the common digit confusions inside a numeric MRZ group.
pub fn fix_digit_confusions(group: &str) -> String {
    group
        .chars()
        .map(|c| match c {
            'O' | 'o' | 'Q' => '0',
            'I' | 'l' | '|' => '1',
            other => other,
        })
        .collect()
}
