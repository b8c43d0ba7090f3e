use wathiq::models::{DocumentType, ExtractedData};
use wathiq::DocumentExtractor;

const EMIRATES_ID_SAMPLE: &str = "\
United Arab Emirates Identity Card
ILARE138357150 9784199248566186
920925M300925CHN<<<
<<LI<YIWEN<<<<<<<<<<<<<<<<<<<<<<<";

const EMIRATES_ID_ARABIC_SAMPLE: &str = "\
دولة الإمارات العربية المتحدة
بطاقة الهوية
الاسم: لي ييوين
الجنسية: الصين";

const TRADE_CERTIFICATE_SAMPLE: &str = "\
Trade Name HORIZON CAFE L.L.C
Issue Date: 01/06/2024 Expiry Date: 01/06/2025
42644548 Owner China LI YIWEN
Economic Registry Number 123456
4721102 Retail Sale of Tea
Snack Selling (Cafeteria)";

fn main() {
    env_logger::init();

    println!("OCR Field Extraction Demo");
    println!("-------------------------");

    let extractor = DocumentExtractor::new();

    println!("\nExtracting Emirates ID sample...");
    let result = extractor.extract(
        EMIRATES_ID_SAMPLE,
        EMIRATES_ID_ARABIC_SAMPLE,
        DocumentType::EmiratesId,
    );
    println!("  Confidence: {:.2} ({})", result.confidence, if result.success { "usable" } else { "low" });
    if let Some(ExtractedData::EmiratesId(record)) = result.data {
        println!("  ID Number: {}", record.id_number);
        println!("  Name: {}", record.name_en);
        println!("  Name (Arabic): {}", record.name_ar);
        println!("  Nationality: {} / {}", record.nationality, record.nationality_ar);
        println!("  Date of Birth: {}", record.date_of_birth);
        println!("  Sex: {:?}", record.sex);
        println!("  Expiry Date: {}", record.expiry_date);
    }

    println!("\nExtracting trade certificate sample...");
    let result = extractor.extract(TRADE_CERTIFICATE_SAMPLE, "", DocumentType::TradeCertificate);
    println!("  Confidence: {:.2} ({})", result.confidence, if result.success { "usable" } else { "low" });
    if let Some(ExtractedData::TradeCertificate(record)) = result.data {
        println!("  Trade Name: {}", record.trade_name);
        println!("  Legal Form: {}", record.legal_form);
        println!("  Issue/Expiry: {} / {}", record.issue_date, record.expiry_date);
        for owner in &record.owners {
            println!(
                "  Owner: {} [{}] {:?} {}",
                owner.name_en, owner.id_number, owner.role, owner.nationality
            );
        }
        for activity in &record.activities {
            println!("  Activity: {} ({})", activity.name_en, activity.code);
        }
    }
}
