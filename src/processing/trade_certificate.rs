//! Trade certificate field extraction.
//!
//! Resolves the bilingual trade name, legal form, key dates, registry
//! identifiers, the owner/manager table and the declared business
//! activities from a single combined English+Arabic transcript. The
//! pattern try-orders here are part of the observable behavior: several
//! candidates can match different substrings of the same certificate, and
//! the first hit wins.

use std::collections::HashSet;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::models::tables::{
    ACTIVITY_CATALOGUE, ARABIC_STOP_WORDS, COMPOUND_ACTIVITY, COMPOUND_ACTIVITY_GENERIC,
    COUNTRY_ARABIC_TO_ENGLISH, COUNTRY_WORDS_AR, COUNTRY_WORDS_EN, NATIONALITY_ARABIC,
};
use crate::models::{ActivityRecord, OwnerRecord, OwnerRole, TradeCertificateRecord};
use crate::processing::normalize::{
    contains_arabic, dmy_to_iso, normalize_name, OcrText,
};

/// Canonical legal-suffix tail appended to resolved trade names.
const CANONICAL_SUFFIX_EN: &str = " - L.L.C - S.P.C";
const CANONICAL_SUFFIX_AR: &str = " - ذ.م.م - ش.ش.و";

lazy_static! {
    // Try-order matters: suffix-anchored candidates first (L.L.C before
    // S.P.C), the explicit label last.
    static ref TRADE_NAME_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"([A-Z][A-Za-z0-9&.\s]{2,48}?)\s*[-–—]?\s*L\s*\.?\s*L\s*\.?\s*C\b").unwrap(),
        Regex::new(r"([A-Z][A-Za-z0-9&.\s]{2,48}?)\s*[-–—]?\s*S\s*\.?\s*P\s*\.?\s*C\b").unwrap(),
        Regex::new(r"(?i)trade\s*name\s*[:#]?\s*([A-Za-z0-9&.\s-]{3,50})").unwrap(),
    ];

    static ref TRADE_NAME_AR_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"([\p{Arabic}][\p{Arabic}0-9\s]{2,48}?)\s*[-–—]?\s*ذ\s*\.?\s*م\s*\.?\s*م").unwrap(),
        Regex::new(r"([\p{Arabic}][\p{Arabic}0-9\s]{2,48}?)\s*[-–—]?\s*ش\s*\.?\s*ش\s*\.?\s*و").unwrap(),
        Regex::new(r"(?:الاسم|الإسم)\s*التجاري\s*[:：]?\s*([\p{Arabic}0-9\s.]{3,50})").unwrap(),
    ];

    static ref TRADE_NAME_LABEL_RE: Regex =
        Regex::new(r"(?i)^trade\s*name\s*[:#]?\s*").unwrap();
    static ref TRADE_NAME_LABEL_AR_RE: Regex =
        Regex::new(r"^(?:الاسم|الإسم)\s*التجاري\s*[:：]?\s*").unwrap();

    static ref LEGAL_SUFFIX_EN_RE: Regex =
        Regex::new(r"(?i)\bL\s*\.?\s*L\s*\.?\s*C\b|\bS\s*\.?\s*P\s*\.?\s*C\b").unwrap();
    static ref LEGAL_SUFFIX_AR_RE: Regex =
        Regex::new(r"ذ\s*\.?\s*م\s*\.?\s*م|ش\s*\.?\s*ش\s*\.?\s*و").unwrap();
    static ref LLC_MARKER_RE: Regex =
        Regex::new(r"(?i)\bL\s*\.?\s*L\s*\.?\s*C\b|ذ\s*\.?\s*م\s*\.?\s*م").unwrap();
    static ref SPC_MARKER_RE: Regex =
        Regex::new(r"(?i)\bS\s*\.?\s*P\s*\.?\s*C\b|ش\s*\.?\s*ش\s*\.?\s*و").unwrap();

    static ref LEGAL_FORM_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)legal\s*(?:form|type)\s*[:#]?\s*([A-Za-z .()-]{3,60})").unwrap(),
    ];
    static ref LEGAL_FORM_AR_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"الشكل\s*القانوني\s*[:：]?\s*([\p{Arabic}\s]{3,60})").unwrap(),
    ];

    static ref OWNER_ROW_RE: Regex = Regex::new(&format!(
        r"\b([0-9]{{5,15}})\s+((?i:Owner|Manager)|مالك|مدير)\s+((?i:{en})|{ar})\s+([A-Z]{{2,}}(?:\s+[A-Z]{{2,}})*)",
        en = COUNTRY_WORDS_EN.join("|"),
        ar = COUNTRY_WORDS_AR.join("|"),
    ))
    .unwrap();

    // Used only when no full table row matched; captures a single
    // role/nationality/name triple with no id.
    static ref OWNER_FALLBACK_RE: Regex = Regex::new(&format!(
        r"\b((?i:Owner|Manager)|مالك|مدير)\s+((?i:{en})|{ar})\s+([A-Z]{{2,}}(?:\s+[A-Z]{{2,}})*)",
        en = COUNTRY_WORDS_EN.join("|"),
        ar = COUNTRY_WORDS_AR.join("|"),
    ))
    .unwrap();

    static ref ISSUE_DATE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:issue\s*date|issued\s+on|establishment\s+date)\s*[:#]?\s*([0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{4})").unwrap(),
        Regex::new(r"تاريخ\s*الإصدار\s*[:：]?\s*([0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{4})").unwrap(),
    ];
    static ref EXPIRY_DATE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:expiry\s*date|valid\s+until|expires\s+on)\s*[:#]?\s*([0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{4})").unwrap(),
        Regex::new(r"تاريخ\s*الانتهاء\s*[:：]?\s*([0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{4})").unwrap(),
    ];
    static ref ECONOMIC_REGISTRY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)economic\s+registry\s+(?:number|no\.?)\s*[:#]?\s*([0-9]{4,12})").unwrap(),
        Regex::new(r"رقم\s*السجل\s*الاقتصادي\s*[:：]?\s*([0-9]{4,12})").unwrap(),
    ];
    static ref TRANSACTION_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)transaction\s+(?:number|no\.?)\s*[:#]?\s*([0-9]{4,15})").unwrap(),
        Regex::new(r"رقم\s*المعاملة\s*[:：]?\s*([0-9]{4,15})").unwrap(),
    ];

    static ref ACTIVITY_CODE_RE: Regex = Regex::new(r"\b([0-9]{7})\b").unwrap();
}

/// Words that terminate the all-caps name capture of an owner row when
/// the certificate prints its section headings in capitals too.
const OWNER_NAME_BOUNDARY_WORDS: &[&str] = &[
    "economic",
    "registry",
    "transaction",
    "number",
    "owner",
    "manager",
    "trade",
    "name",
    "licence",
    "license",
    "activity",
    "activities",
    "nationality",
    "expiry",
    "issue",
];

pub struct TradeCertificateExtractor;

impl TradeCertificateExtractor {
    pub fn extract(text: &OcrText) -> TradeCertificateRecord {
        let full = &text.full_text;
        let mut record = TradeCertificateRecord::default();

        record.trade_name = Self::trade_name(text).unwrap_or_default();
        record.trade_name_ar = Self::trade_name_ar(full).unwrap_or_default();
        let (legal_form, legal_form_ar) = Self::legal_form(full);
        record.legal_form = legal_form;
        record.legal_form_ar = legal_form_ar;

        record.issue_date = first_capture(&ISSUE_DATE_PATTERNS, full)
            .map(|value| dmy_to_iso(&value))
            .unwrap_or_default();
        record.expiry_date = first_capture(&EXPIRY_DATE_PATTERNS, full)
            .map(|value| dmy_to_iso(&value))
            .unwrap_or_default();
        record.economic_registry_number = first_capture(&ECONOMIC_REGISTRY_PATTERNS, full);
        record.transaction_number = first_capture(&TRANSACTION_PATTERNS, full);

        record.owners = Self::owners(text);
        record.activities = Self::activities(full);
        record
    }

    /// English trade name: first suffix-anchored or label-anchored match,
    /// cleaned and re-suffixed; line scan as the last resort.
    fn trade_name(text: &OcrText) -> Option<String> {
        for pattern in TRADE_NAME_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(&text.full_text) {
                if let Some(matched) = caps.get(1) {
                    if let Some(name) = Self::clean_trade_name(matched.as_str()) {
                        debug!("trade certificate: trade name resolved from full text");
                        return Some(name);
                    }
                }
            }
        }
        // Line-scan fallback: a short mostly-uppercase line that is not a
        // field label
        for line in &text.lines {
            if line.len() < 3 || line.len() > 50 || contains_arabic(line) {
                continue;
            }
            let letters = line.chars().filter(|c| c.is_ascii_alphabetic()).count();
            let upper = line.chars().filter(|c| c.is_ascii_uppercase()).count();
            if letters < 3 || upper * 2 < letters || line.split_whitespace().count() < 2 {
                continue;
            }
            if let Some(name) = Self::clean_trade_name(line) {
                debug!("trade certificate: trade name resolved from line scan");
                return Some(name);
            }
        }
        None
    }

    fn clean_trade_name(raw: &str) -> Option<String> {
        let stripped = TRADE_NAME_LABEL_RE.replace(raw.trim(), "");
        let cleaned = stripped
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':' | '.' | ','))
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if cleaned.len() < 3 || cleaned.len() > 50 {
            return None;
        }
        Some(ensure_suffix(&cleaned, &LEGAL_SUFFIX_EN_RE, CANONICAL_SUFFIX_EN))
    }

    /// Mirror of the English resolution on the Arabic legal-suffix markers
    /// and the explicit Arabic label.
    fn trade_name_ar(full_text: &str) -> Option<String> {
        for pattern in TRADE_NAME_AR_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(full_text) {
                if let Some(matched) = caps.get(1) {
                    // The label can leak into a suffix-anchored capture;
                    // strip it either way
                    let stripped = TRADE_NAME_LABEL_AR_RE.replace(matched.as_str().trim(), "");
                    let cleaned = trim_at_arabic_stop_word(
                        stripped.trim_matches(|c: char| {
                            c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':' | '：' | '.')
                        }),
                    );
                    if cleaned.chars().count() >= 3 {
                        return Some(ensure_suffix(&cleaned, &LEGAL_SUFFIX_AR_RE, CANONICAL_SUFFIX_AR));
                    }
                }
            }
        }
        None
    }

    /// Label-anchored legal form, else derived from whichever legal-suffix
    /// marker appears in the text (L.L.C checked before S.P.C).
    fn legal_form(full_text: &str) -> (String, String) {
        let labeled = first_capture(&LEGAL_FORM_PATTERNS, full_text)
            .map(|value| trim_owner_name(value.trim()))
            .unwrap_or_default();
        let labeled_ar = first_capture(&LEGAL_FORM_AR_PATTERNS, full_text)
            .map(|value| trim_at_arabic_stop_word(value.trim()))
            .unwrap_or_default();
        if !labeled.is_empty() || !labeled_ar.is_empty() {
            return (labeled, labeled_ar);
        }
        if LLC_MARKER_RE.is_match(full_text) {
            return (
                "Limited Liability Company".to_string(),
                "شركة ذات مسؤولية محدودة".to_string(),
            );
        }
        if SPC_MARKER_RE.is_match(full_text) {
            return (
                "Sole Proprietorship Company".to_string(),
                "شركة الشخص الواحد".to_string(),
            );
        }
        (String::new(), String::new())
    }

    /// Owner table rows, deduplicated by (id, normalized name) so the same
    /// person listed under both headings is counted once. Arabic names are
    /// assigned positionally afterwards.
    fn owners(text: &OcrText) -> Vec<OwnerRecord> {
        let full = &text.full_text;
        let mut owners = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for caps in OWNER_ROW_RE.captures_iter(full) {
            let id = caps.get(1).map_or("", |m| m.as_str()).to_string();
            let role = parse_role(caps.get(2).map_or("", |m| m.as_str()));
            let nationality_raw = caps.get(3).map_or("", |m| m.as_str());
            let name = trim_owner_name(caps.get(4).map_or("", |m| m.as_str()));
            if name.is_empty() {
                continue;
            }
            let name_en = normalize_name(&name);
            if !seen.insert((id.clone(), name_en.clone())) {
                continue;
            }
            owners.push(build_owner(id, name_en, role, nationality_raw));
        }

        if owners.is_empty() {
            if let Some(caps) = OWNER_FALLBACK_RE.captures(full) {
                let role = parse_role(caps.get(1).map_or("", |m| m.as_str()));
                let nationality_raw = caps.get(2).map_or("", |m| m.as_str());
                let name = trim_owner_name(caps.get(3).map_or("", |m| m.as_str()));
                if !name.is_empty() {
                    debug!("trade certificate: owner resolved via id-less fallback");
                    owners.push(build_owner(
                        String::new(),
                        normalize_name(&name),
                        role,
                        nationality_raw,
                    ));
                }
            }
        }

        // Positional assignment: the Nth Arabic name found is given to the
        // Nth owner in table order. This assumes OCR reading order matches
        // the table rows and does no semantic matching.
        let arabic_names = Self::arabic_name_candidates(text);
        for (owner, name_ar) in owners.iter_mut().zip(arabic_names) {
            if owner.name_ar.is_empty() {
                owner.name_ar = name_ar;
            }
        }
        owners
    }

    fn arabic_name_candidates(text: &OcrText) -> Vec<String> {
        let mut candidates = Vec::new();
        for line in &text.lines {
            let mut run: Vec<&str> = Vec::new();
            for word in line.split_whitespace().chain(std::iter::once("")) {
                if contains_arabic(word) && !is_arabic_stop_word(word) {
                    run.push(word);
                    continue;
                }
                if run.len() >= 2 {
                    let candidate = run.join(" ");
                    if !candidates.contains(&candidate) {
                        candidates.push(candidate);
                    }
                }
                run.clear();
            }
        }
        candidates
    }

    /// Catalogue scan: the compound phrase first, then the generic list,
    /// each phrase reported at most once.
    fn activities(full_text: &str) -> Vec<ActivityRecord> {
        let lower = full_text.to_lowercase();
        let mut seen: HashSet<String> = HashSet::new();
        let mut activities = Vec::new();

        let (compound_en, compound_ar) = COMPOUND_ACTIVITY;
        if let Some(pos) = lower.find(&compound_en.to_lowercase()) {
            activities.push(ActivityRecord {
                code: activity_code_near(&lower, pos),
                name_en: compound_en.to_string(),
                name_ar: compound_ar.to_string(),
            });
            seen.insert(compound_en.to_lowercase());
            // The generic entry is subsumed; never re-add it
            seen.insert(COMPOUND_ACTIVITY_GENERIC.to_lowercase());
        }

        for (name_en, name_ar) in ACTIVITY_CATALOGUE.iter() {
            let key = name_en.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            if let Some(pos) = lower.find(&key) {
                activities.push(ActivityRecord {
                    code: activity_code_near(&lower, pos),
                    name_en: name_en.to_string(),
                    name_ar: name_ar.to_string(),
                });
                seen.insert(key);
            }
        }
        activities
    }
}

fn ensure_suffix(name: &str, suffix_re: &Regex, canonical: &str) -> String {
    if suffix_re.is_match(name) {
        name.to_string()
    } else {
        format!("{}{}", name, canonical)
    }
}

fn parse_role(raw: &str) -> OwnerRole {
    if raw.eq_ignore_ascii_case("manager") || raw == "مدير" {
        OwnerRole::Manager
    } else {
        OwnerRole::Owner
    }
}

fn build_owner(
    id_number: String,
    name_en: String,
    role: OwnerRole,
    nationality_raw: &str,
) -> OwnerRecord {
    let (nationality, nationality_ar) = if contains_arabic(nationality_raw) {
        let english = COUNTRY_ARABIC_TO_ENGLISH
            .get(nationality_raw)
            .map(|label| label.to_string())
            .unwrap_or_default();
        (english, nationality_raw.to_string())
    } else {
        let arabic = NATIONALITY_ARABIC
            .get(nationality_raw.to_uppercase().as_str())
            .map(|label| label.to_string())
            .unwrap_or_default();
        (nationality_raw.to_string(), arabic)
    };
    OwnerRecord {
        id_number,
        name_en,
        name_ar: String::new(),
        role,
        role_ar: role.arabic().to_string(),
        nationality,
        nationality_ar,
    }
}

fn trim_owner_name(value: &str) -> String {
    let mut kept = Vec::new();
    for word in value.split_whitespace() {
        if OWNER_NAME_BOUNDARY_WORDS.contains(&word.to_lowercase().as_str()) {
            break;
        }
        kept.push(word);
    }
    kept.join(" ")
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

/// Recover a 7-digit activity code printed near the phrase occurrence.
fn activity_code_near(lower_text: &str, pos: usize) -> String {
    let mut start = pos.saturating_sub(60);
    let mut end = (pos + 60).min(lower_text.len());
    while start > 0 && !lower_text.is_char_boundary(start) {
        start -= 1;
    }
    while end < lower_text.len() && !lower_text.is_char_boundary(end) {
        end += 1;
    }
    ACTIVITY_CODE_RE
        .captures(&lower_text[start..end])
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Trade Name HORIZON CAFE L.L.C License Details 42644548 Owner China LI YIWEN Economic Registry Number 123456 Retail Sale of Tea";

    #[test]
    fn test_minimal_certificate() {
        let record = TradeCertificateExtractor::extract(&OcrText::new(SAMPLE));
        assert!(record.trade_name.starts_with("HORIZON CAFE"));
        assert!(record.trade_name.ends_with("L.L.C - S.P.C"));
        assert_eq!(record.owners.len(), 1);
        let owner = &record.owners[0];
        assert_eq!(owner.id_number, "42644548");
        assert_eq!(owner.name_en, "Li Yiwen");
        assert_eq!(owner.role, OwnerRole::Owner);
        assert_eq!(owner.role_ar, "مالك");
        assert_eq!(owner.nationality, "China");
        assert_eq!(owner.nationality_ar, "الصين");
        assert_eq!(record.economic_registry_number.as_deref(), Some("123456"));
        assert_eq!(record.activities.len(), 1);
        assert_eq!(record.activities[0].name_en, "Retail Sale of Tea");
        assert_eq!(record.activities[0].code, "");
        // L.L.C marker present, no explicit label
        assert_eq!(record.legal_form, "Limited Liability Company");
        assert_eq!(record.legal_form_ar, "شركة ذات مسؤولية محدودة");
    }

    #[test]
    fn test_owner_dedup_across_role_headings() {
        let text = "42644548 Owner China LI YIWEN 42644548 Manager China LI YIWEN";
        let record = TradeCertificateExtractor::extract(&OcrText::new(text));
        assert_eq!(record.owners.len(), 1);
        // First occurrence wins
        assert_eq!(record.owners[0].role, OwnerRole::Owner);
    }

    #[test]
    fn test_distinct_ids_are_both_kept() {
        let text = "42644548 Owner China LI YIWEN 99887766 Manager India RAVI KUMAR";
        let record = TradeCertificateExtractor::extract(&OcrText::new(text));
        assert_eq!(record.owners.len(), 2);
        assert_eq!(record.owners[1].name_en, "Ravi Kumar");
        assert_eq!(record.owners[1].role, OwnerRole::Manager);
        assert_eq!(record.owners[1].role_ar, "مدير");
    }

    #[test]
    fn test_idless_fallback_owner() {
        let text = "Owner China LI YIWEN runs this establishment";
        let record = TradeCertificateExtractor::extract(&OcrText::new(text));
        assert_eq!(record.owners.len(), 1);
        assert_eq!(record.owners[0].id_number, "");
        assert_eq!(record.owners[0].name_en, "Li Yiwen");
    }

    #[test]
    fn test_compound_activity_not_double_counted() {
        let text = "Activities: Snack Selling (Cafeteria) and Trading";
        let record = TradeCertificateExtractor::extract(&OcrText::new(text));
        let names: Vec<&str> = record
            .activities
            .iter()
            .map(|a| a.name_en.as_str())
            .collect();
        assert_eq!(names, vec!["Snack Selling (Cafeteria)", "Trading"]);
    }

    #[test]
    fn test_activity_matched_once_despite_repetition() {
        let text = "Retail Sale of Tea ... Retail Sale of Tea";
        let record = TradeCertificateExtractor::extract(&OcrText::new(text));
        assert_eq!(record.activities.len(), 1);
    }

    #[test]
    fn test_activity_code_recovered_near_phrase() {
        let text = "4721102 Retail Sale of Tea";
        let record = TradeCertificateExtractor::extract(&OcrText::new(text));
        assert_eq!(record.activities[0].code, "4721102");
    }

    #[test]
    fn test_arabic_trade_name_label_and_suffix() {
        let text = "الاسم التجاري مقهى الأفق ذ.م.م";
        let record = TradeCertificateExtractor::extract(&OcrText::new(text));
        assert!(record.trade_name_ar.contains("مقهى الأفق"));
    }

    #[test]
    fn test_arabic_name_assigned_positionally() {
        let text = "42644548 Owner China LI YIWEN\nلي ييوين محترم";
        let record = TradeCertificateExtractor::extract(&OcrText::new(text));
        assert_eq!(record.owners.len(), 1);
        assert_eq!(record.owners[0].name_ar, "لي ييوين محترم");
    }

    #[test]
    fn test_label_anchored_dates_and_transaction() {
        let text = "Issue Date: 01/06/2024 Expiry Date: 01/06/2025 Transaction Number 998877";
        let record = TradeCertificateExtractor::extract(&OcrText::new(text));
        assert_eq!(record.issue_date, "2024-06-01");
        assert_eq!(record.expiry_date, "2025-06-01");
        assert_eq!(record.transaction_number.as_deref(), Some("998877"));
        assert_eq!(record.economic_registry_number, None);
    }

    #[test]
    fn test_trade_name_line_scan_fallback() {
        let text = "License No 12345\nHORIZON CAFE\nIssued by DED";
        let record = TradeCertificateExtractor::extract(&OcrText::new(text));
        assert_eq!(record.trade_name, "HORIZON CAFE - L.L.C - S.P.C");
    }

    #[test]
    fn test_empty_input_degrades_gracefully() {
        let record = TradeCertificateExtractor::extract(&OcrText::new(""));
        assert_eq!(record, TradeCertificateRecord::default());
    }
}
