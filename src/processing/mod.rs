pub mod emirates_id;
pub mod mrz;
pub mod normalize;
pub mod passport;
pub mod trade_certificate;

pub use emirates_id::EmiratesIdExtractor;
pub use normalize::OcrText;
pub use passport::PassportExtractor;
pub use trade_certificate::TradeCertificateExtractor;
