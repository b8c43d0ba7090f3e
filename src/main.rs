// Command line front-end: reads OCR transcripts from files, runs the
// extraction pipeline, and prints the result as JSON.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use wathiq::models::DocumentType;
use wathiq::utils::ExtractError;
use wathiq::DocumentExtractor;

#[derive(Parser)]
#[command(
    name = "wathiq",
    about = "Extract structured fields from bilingual OCR transcripts of UAE corporate documents"
)]
struct Args {
    /// Document type tag: emirates_id, passport or trade_certificate
    #[arg(long, value_name = "TYPE")]
    doc_type: String,

    /// English-pass OCR transcript
    #[arg(long, value_name = "FILE")]
    english: PathBuf,

    /// Arabic-pass OCR transcript (optional; some documents are read in a
    /// single pass)
    #[arg(long, value_name = "FILE")]
    arabic: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ExtractError> {
    let document_type = DocumentType::from_tag(&args.doc_type)
        .ok_or_else(|| ExtractError::UnknownDocumentType(args.doc_type.clone()))?;
    let english = fs::read_to_string(&args.english)?;
    let arabic = match &args.arabic {
        Some(path) => fs::read_to_string(path)?,
        None => String::new(),
    };

    let result = DocumentExtractor::new().extract(&english, &arabic, document_type);
    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);
    Ok(())
}
