//! Extract command - extract fields from a single OCR dump.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use facturape_core::ocr::{lines_from_json, lines_from_text};
use facturape_core::{CascadeInvoiceParser, ExtractionReport, ExtractionResult, OcrLine};

use super::config::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file: OCR dump (.json) or recognized text, one line per row (.txt)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show which strategy resolved each field, plus warnings
    #[arg(long)]
    report: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let lines = read_lines(&args.input)?;
    debug!("Read {} OCR lines", lines.len());

    let parser = CascadeInvoiceParser::from_config(&config.extraction);
    let report = parser.extract_detailed(&lines);

    // Format output
    let output = format_result(&report.result, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.report {
        print_report(&report);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read OCR lines from a dump, choosing the decoder by file extension.
pub fn read_lines(path: &Path) -> anyhow::Result<Vec<OcrLine>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let content = fs::read_to_string(path)?;

    match extension.as_str() {
        "json" => Ok(lines_from_json(&content)?),
        "txt" => Ok(lines_from_text(&content)),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["ruc_emisor", "fecha_emision", "moneda", "total"])?;
    wtr.write_record([
        result.issuer_ruc.as_deref().unwrap_or_default(),
        result.issue_date.as_deref().unwrap_or_default(),
        result.currency.code(),
        &format!("{:.2}", result.total),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "RUC emisor: {}\n",
        result.issuer_ruc.as_deref().unwrap_or("not detected")
    ));

    let date = match (&result.issue_date, result.emission_date()) {
        (Some(raw), Some(parsed)) => format!("{} ({})", raw, parsed),
        (Some(raw), None) => raw.clone(),
        (None, _) => "not detected".to_string(),
    };
    output.push_str(&format!("Fecha:      {}\n", date));
    output.push_str(&format!("Total:      {:.2} {}\n", result.total, result.currency));

    output
}

fn print_report(report: &ExtractionReport) {
    eprintln!();
    match report.ruc_source {
        Some(source) => eprintln!("{} RUC resolved by {:?}", style("ℹ").blue(), source),
        None => eprintln!("{} RUC not resolved", style("ℹ").blue()),
    }
    if let Some(total) = &report.total_source {
        eprintln!(
            "{} Total read from line {} ({:?} keyword on line {})",
            style("ℹ").blue(),
            total.amount_line + 1,
            total.tier,
            total.keyword_line + 1
        );
    }
    for warning in &report.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }
    eprintln!(
        "{} Processing time: {}ms",
        style("ℹ").blue(),
        report.processing_time_ms
    );
}
