// Fixed lookup tables used across the extractors. All read-only, built
// once at startup.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// MRZ 3-letter nationality codes to the English labels printed on the
    /// card face. Unmapped codes pass through uppercased.
    pub static ref MRZ_NATIONALITY_CODES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("CHN", "CHINA");
        m.insert("IND", "INDIA");
        m.insert("PAK", "PAKISTAN");
        m.insert("ARE", "UAE");
        m.insert("PHL", "PHILIPPINES");
        m.insert("BGD", "BANGLADESH");
        m.insert("EGY", "EGYPT");
        m.insert("USA", "USA");
        m.insert("GBR", "UK");
        m
    };

    /// English nationality labels (uppercase) to their Arabic rendering in
    /// the generated documents. Covers both country names and demonyms
    /// since trade licences use either.
    pub static ref NATIONALITY_ARABIC: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("CHINA", "الصين");
        m.insert("CHINESE", "الصين");
        m.insert("INDIA", "الهند");
        m.insert("INDIAN", "الهند");
        m.insert("PAKISTAN", "باكستان");
        m.insert("PAKISTANI", "باكستان");
        m.insert("UAE", "الإمارات");
        m.insert("EMIRATI", "الإمارات");
        m.insert("PHILIPPINES", "الفلبين");
        m.insert("FILIPINO", "الفلبين");
        m.insert("BANGLADESH", "بنغلاديش");
        m.insert("BANGLADESHI", "بنغلاديش");
        m.insert("EGYPT", "مصر");
        m.insert("EGYPTIAN", "مصر");
        m.insert("USA", "الولايات المتحدة");
        m.insert("AMERICAN", "الولايات المتحدة");
        m.insert("UK", "المملكة المتحدة");
        m.insert("BRITISH", "المملكة المتحدة");
        m.insert("JORDAN", "الأردن");
        m.insert("JORDANIAN", "الأردن");
        m.insert("SYRIA", "سوريا");
        m.insert("SYRIAN", "سوريا");
        m.insert("LEBANON", "لبنان");
        m.insert("LEBANESE", "لبنان");
        m
    };

    /// Arabic country words back to the English label, for owner rows
    /// where the nationality column was read from the Arabic half.
    pub static ref COUNTRY_ARABIC_TO_ENGLISH: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("الصين", "China");
        m.insert("الهند", "India");
        m.insert("باكستان", "Pakistan");
        m.insert("الفلبين", "Philippines");
        m.insert("بنغلاديش", "Bangladesh");
        m.insert("مصر", "Egypt");
        m.insert("الأردن", "Jordan");
        m.insert("سوريا", "Syria");
        m.insert("لبنان", "Lebanon");
        m.insert("الإمارات", "UAE");
        m
    };

    /// Three-letter month abbreviations for "DD MMM YYYY" passport dates.
    pub static ref MONTH_ABBREVIATIONS: HashMap<&'static str, u32> = {
        let mut m = HashMap::new();
        m.insert("jan", 1);
        m.insert("feb", 2);
        m.insert("mar", 3);
        m.insert("apr", 4);
        m.insert("may", 5);
        m.insert("jun", 6);
        m.insert("jul", 7);
        m.insert("aug", 8);
        m.insert("sep", 9);
        m.insert("oct", 10);
        m.insert("nov", 11);
        m.insert("dec", 12);
        m
    };
}

/// Arabic document-label words that disqualify a line (or break a word run)
/// from being read as a person's name.
pub const ARABIC_STOP_WORDS: &[&str] = &[
    "الاسم",
    "الإسم",
    "الجنسية",
    "تاريخ",
    "بطاقة",
    "الهوية",
    "رقم",
    "الميلاد",
    "الانتهاء",
    "الإصدار",
    "دولة",
    "الإمارات",
    "المتحدة",
    "العربية",
    "ذكر",
    "أنثى",
    "دبي",
    "أبوظبي",
    "الشارقة",
    "عجمان",
    "التجاري",
    "التجارية",
    "رخصة",
    "الرخصة",
    "النشاط",
    "مالك",
    "مدير",
    "شركة",
];

/// Country words accepted as the nationality column of an owner table row.
pub const COUNTRY_WORDS_EN: &[&str] = &[
    "China",
    "India",
    "Pakistan",
    "Philippines",
    "Bangladesh",
    "Egypt",
    "Jordan",
    "Syria",
    "Lebanon",
    "UAE",
    "USA",
    "UK",
];

pub const COUNTRY_WORDS_AR: &[&str] = &[
    "الصين",
    "الهند",
    "باكستان",
    "الفلبين",
    "بنغلاديش",
    "مصر",
    "الأردن",
    "سوريا",
    "لبنان",
    "الإمارات",
];

/// Compound activity phrase checked before the generic catalogue so it is
/// never double-reported as a partial match.
pub const COMPOUND_ACTIVITY: (&str, &str) =
    ("Snack Selling (Cafeteria)", "بيع الوجبات الخفيفة (كافتيريا)");

/// Generic catalogue entry the compound phrase subsumes.
pub const COMPOUND_ACTIVITY_GENERIC: &str = "Snack Selling";

/// Known declared business activities: English phrase and its Arabic
/// translation as printed on trade licences.
pub const ACTIVITY_CATALOGUE: &[(&str, &str)] = &[
    ("Snack Selling", "بيع الوجبات الخفيفة"),
    ("Retail Sale of Tea", "بيع الشاي بالتجزئة"),
    ("Retail Sale of Coffee", "بيع القهوة بالتجزئة"),
    ("Retail Sale of Soft Drinks", "بيع المشروبات الغازية بالتجزئة"),
    ("Juice Preparing", "تحضير العصائر"),
    ("Ice Cream Selling", "بيع المثلجات"),
    ("Foodstuff Trading", "تجارة المواد الغذائية"),
    ("General Trading", "التجارة العامة"),
    ("Trading", "تجارة"),
    ("Coffee Shop", "مقهى"),
    ("Restaurant", "مطعم"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mrz_nationality_codes() {
        assert_eq!(MRZ_NATIONALITY_CODES.get("CHN"), Some(&"CHINA"));
        assert_eq!(MRZ_NATIONALITY_CODES.get("ARE"), Some(&"UAE"));
        assert_eq!(MRZ_NATIONALITY_CODES.get("ZZZ"), None);
    }

    #[test]
    fn test_nationality_arabic_covers_demonyms() {
        assert_eq!(NATIONALITY_ARABIC.get("CHINA"), NATIONALITY_ARABIC.get("CHINESE"));
        assert_eq!(NATIONALITY_ARABIC.get("INDIA"), Some(&"الهند"));
    }

    #[test]
    fn test_month_abbreviations_complete() {
        assert_eq!(MONTH_ABBREVIATIONS.len(), 12);
        assert_eq!(MONTH_ABBREVIATIONS.get("sep"), Some(&9));
    }

    #[test]
    fn test_compound_activity_subsumes_generic() {
        assert!(COMPOUND_ACTIVITY.0.starts_with(COMPOUND_ACTIVITY_GENERIC));
        assert!(ACTIVITY_CATALOGUE.iter().any(|(en, _)| *en == COMPOUND_ACTIVITY_GENERIC));
    }
}
