//! Machine-readable zone parsing for Emirates ID cards.
//!
//! The MRZ is a fixed 3-line block: line 1 carries a document-series
//! prefix plus the 15-digit ID number (country code 784 first), line 2
//! carries date of birth, sex, expiry date and a 3-letter nationality
//! code, line 3 carries the name as SURNAME<GIVENNAME<<< filler. Each
//! line is matched against an ordered list of alternatives of decreasing
//! strictness; the first that matches wins.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::models::tables::MRZ_NATIONALITY_CODES;
use crate::models::Sex;
use crate::processing::normalize::{fix_digit_confusions, mrz_date_to_iso, OcrText};

lazy_static! {
    static ref EID_LINE1_PATTERNS: Vec<Regex> = vec![
        // Card-series prefix shortly before the number run
        Regex::new(r"I[DL]ARE[0-9O<\s]{0,20}?(784[0-9]{12})").unwrap(),
        // Bare 15-digit run opening with the 784 country code
        Regex::new(r"(784[0-9]{12})").unwrap(),
        // Pre-formatted number with separators
        Regex::new(r"(784[-\s][0-9]{4}[-\s][0-9]{7}[-\s][0-9])").unwrap(),
        // Digit confusions inside the run
        Regex::new(r"(784[0-9OIl]{12})").unwrap(),
    ];

    static ref EID_LINE2_PATTERNS: Vec<Regex> = vec![
        // Full TD1 layout: DOB, check digit, sex, expiry, check digit, nationality
        Regex::new(r"([0-9]{6})[0-9]([MF])([0-9]{6})[0-9]([A-Z]{3})").unwrap(),
        // Check digits dropped by the OCR pass
        Regex::new(r"([0-9]{6})([MF])([0-9]{6})([A-Z]{3})").unwrap(),
        // Digit confusions in the date groups
        Regex::new(r"([0-9OIl]{6})([MF])([0-9OIl]{6})([A-Z]{3})").unwrap(),
        // Nationality unreadable
        Regex::new(r"([0-9]{6})[0-9]?([MF])[0-9]?([0-9]{6})").unwrap(),
    ];

    static ref EID_LINE3_PATTERNS: Vec<Regex> = vec![
        // SURNAME<GIVEN followed by filler
        Regex::new(r"([A-Z]{2,}(?:<+[A-Z]{2,})+)<{2,}").unwrap(),
        // Leading filler before the name block
        Regex::new(r"<<([A-Z]+(?:<+[A-Z]+)+)").unwrap(),
        // Any name-shaped block terminated by a single filler
        Regex::new(r"([A-Z]+(?:<+[A-Z]+)+)<").unwrap(),
    ];
}

/// Fields resolved from the MRZ block. Anything the patterns could not
/// settle stays empty and falls through to the free-text tier.
#[derive(Debug, Default)]
pub struct EidMrz {
    /// Raw digit run, unformatted.
    pub id_number: String,
    /// ISO date or empty.
    pub date_of_birth: String,
    pub sex: Option<Sex>,
    /// ISO date or empty.
    pub expiry_date: String,
    /// Mapped English label, uppercased.
    pub nationality: String,
    /// Space-joined name in MRZ order (surname first), not yet cased.
    pub name: String,
}

impl EidMrz {
    pub fn parse(text: &OcrText) -> EidMrz {
        let mut mrz = EidMrz::default();
        mrz.parse_line1(&text.full_text);
        mrz.parse_line2(&text.full_text);
        mrz.parse_line3(&text.full_text);
        mrz
    }

    fn parse_line1(&mut self, full_text: &str) {
        for pattern in EID_LINE1_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(full_text) {
                if let Some(matched) = caps.get(1) {
                    let digits = fix_digit_confusions(matched.as_str());
                    let digits: String =
                        digits.chars().filter(|c| c.is_ascii_digit()).collect();
                    if digits.len() == 15 {
                        debug!("mrz line 1 resolved id number");
                        self.id_number = digits;
                        return;
                    }
                }
            }
        }
    }

    fn parse_line2(&mut self, full_text: &str) {
        for pattern in EID_LINE2_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(full_text) {
                let birth = fix_digit_confusions(caps.get(1).map_or("", |m| m.as_str()));
                let expiry = fix_digit_confusions(caps.get(3).map_or("", |m| m.as_str()));
                let date_of_birth = mrz_date_to_iso(&birth);
                let expiry_date = mrz_date_to_iso(&expiry);
                // A hit with two bogus dates is OCR noise, not the MRZ line
                if date_of_birth.is_empty() && expiry_date.is_empty() {
                    continue;
                }
                debug!("mrz line 2 resolved date and sex fields");
                self.date_of_birth = date_of_birth;
                self.expiry_date = expiry_date;
                self.sex = match caps.get(2).map(|m| m.as_str()) {
                    Some("M") => Some(Sex::M),
                    Some("F") => Some(Sex::F),
                    _ => None,
                };
                if let Some(code) = caps.get(4) {
                    self.nationality = match MRZ_NATIONALITY_CODES.get(code.as_str()) {
                        Some(label) => label.to_string(),
                        None => code.as_str().to_uppercase(),
                    };
                }
                return;
            }
        }
    }

    fn parse_line3(&mut self, full_text: &str) {
        for pattern in EID_LINE3_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(full_text) {
                if let Some(matched) = caps.get(1) {
                    let name = matched
                        .as_str()
                        .split('<')
                        .filter(|part| !part.is_empty())
                        .collect::<Vec<_>>()
                        .join(" ");
                    if !name.is_empty() {
                        debug!("mrz line 3 resolved name");
                        self.name = name;
                        return;
                    }
                }
            }
        }
    }
}
